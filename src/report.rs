use serde::{Deserialize, Serialize};

use crate::{
    complaint::{Classification, ClassificationOutcome},
    error::ProcessingError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Response envelope handed to the web layer for a single complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: ReportStatus,
    pub message: String,
    pub department_id: u8,
    pub priority_score: u8,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &ClassificationOutcome) -> Self {
        let (department_id, priority_score) = outcome.ids();
        AnalysisReport {
            status: ReportStatus::Success,
            message: "Complaint analyzed successfully".to_string(),
            department_id,
            priority_score,
        }
    }

    pub fn rejected(err: &ProcessingError) -> Self {
        let defaults = Classification::default();
        AnalysisReport {
            status: ReportStatus::Error,
            message: err.to_string(),
            department_id: defaults.department_id(),
            priority_score: defaults.priority_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::{Department, PriorityTier};
    use serde_json::json;

    #[test]
    fn test_success_report_json() {
        let outcome = ClassificationOutcome::Classified(Classification::new(
            Department::Water,
            PriorityTier::High,
        ));
        let report = AnalysisReport::from_outcome(&outcome);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "status": "success",
                "message": "Complaint analyzed successfully",
                "department_id": 2,
                "priority_score": 3
            })
        );
    }

    #[test]
    fn test_rejected_report_uses_defaults() {
        let err = ProcessingError::InvalidComplaintData("Complaint text is empty".to_string());
        let report = AnalysisReport::rejected(&err);
        assert_eq!(report.status, ReportStatus::Error);
        assert_eq!(report.message, "Invalid complaint data: Complaint text is empty");
        assert_eq!((report.department_id, report.priority_score), (5, 2));
    }
}
