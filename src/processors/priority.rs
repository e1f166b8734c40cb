use crate::{
    complaint::{PriorityTier, ProcessedComplaint, ProcessingResult, UrgencySignal},
    error::ProcessingError,
    pipeline::{ComplaintProcessor, FieldMask},
};
use async_trait::async_trait;
use log::{info, warn};

/// A single keyword at or above this weight forces `High`.
pub const OVERRIDE_WEIGHT_HIGH: u32 = 4;
/// A single keyword at or above this weight guarantees at least `Medium`.
pub const OVERRIDE_WEIGHT_MEDIUM: u32 = 2;
pub const HIGH_SCORE_THRESHOLD: f32 = 12.0;
pub const MEDIUM_SCORE_THRESHOLD: f32 = 6.0;

pub struct PriorityProcessor;

#[async_trait]
impl ComplaintProcessor for PriorityProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "PriorityProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        // Priority combines the urgency lexicon, entity density and sentiment.
        // Any degraded estimator masks the whole score with Medium.
        let priority_result = self.calculate_priority(&complaint);
        if let Some(cause) = priority_result.cause() {
            warn!(
                "Priority for complaint {} fell back to {}: {}",
                complaint_id,
                PriorityTier::Medium,
                cause
            );
        }
        let result = complaint.with_priority(priority_result);

        info!(
            "PriorityProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::ENTITIES | FieldMask::SENTIMENT | FieldMask::URGENCY
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::PRIORITY
    }
}

impl PriorityProcessor {
    pub fn new() -> Self {
        Self
    }

    fn calculate_priority(&self, complaint: &ProcessedComplaint) -> ProcessingResult<PriorityTier> {
        let upstream_failure = complaint
            .entities
            .cause()
            .or_else(|| complaint.sentiment.cause())
            .or_else(|| complaint.urgency.cause());
        if let Some(cause) = upstream_failure {
            return ProcessingResult::Degraded(PriorityTier::Medium, cause.clone());
        }

        match (
            complaint.entities.value(),
            complaint.sentiment.value(),
            complaint.urgency.value(),
        ) {
            (Some(entities), Some(sentiment), Some(urgency)) => {
                ProcessingResult::Success(determine_priority(urgency, *entities, *sentiment))
            }
            _ => ProcessingResult::Degraded(
                PriorityTier::Medium,
                ProcessingError::PriorityCalculationError(
                    "Insufficient data to calculate priority - entities, sentiment and urgency are required".to_string(),
                ),
            ),
        }
    }
}

impl Default for PriorityProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps polarity in `[-1, 1]` onto `[0, 1]`, where 1 is the most negative
/// and therefore most urgent.
pub fn sentiment_factor(polarity: f32) -> f32 {
    (1.0 - polarity) / 2.0
}

pub fn final_score(urgency: &UrgencySignal, entity_density: u8, polarity: f32) -> f32 {
    urgency.score as f32 + f32::from(entity_density) * 2.0 + sentiment_factor(polarity) * 3.0
}

/// Threshold rule with a keyword-weight override: one severe term is never
/// diluted by an otherwise calm complaint.
pub fn determine_priority(
    urgency: &UrgencySignal,
    entity_density: u8,
    polarity: f32,
) -> PriorityTier {
    let score = final_score(urgency, entity_density, polarity);

    match (urgency.max_weight, score) {
        (w, s) if w >= OVERRIDE_WEIGHT_HIGH || s >= HIGH_SCORE_THRESHOLD => PriorityTier::High,
        (w, s) if w >= OVERRIDE_WEIGHT_MEDIUM || s >= MEDIUM_SCORE_THRESHOLD => {
            PriorityTier::Medium
        }
        _ => PriorityTier::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::Complaint;
    use chrono::Utc;

    fn signal(score: u32, max_weight: u32) -> UrgencySignal {
        UrgencySignal { score, max_weight }
    }

    fn complaint_with(
        entities: ProcessingResult<u8>,
        sentiment: ProcessingResult<f32>,
        urgency: ProcessingResult<UrgencySignal>,
    ) -> ProcessedComplaint {
        ProcessedComplaint::new(Complaint::new(
            "c-1".to_string(),
            "content".to_string(),
            Utc::now(),
        ))
        .with_entities(entities)
        .with_sentiment(sentiment)
        .with_urgency(urgency)
    }

    #[test]
    fn test_sentiment_factor_range() {
        assert_eq!(sentiment_factor(-1.0), 1.0);
        assert_eq!(sentiment_factor(0.0), 0.5);
        assert_eq!(sentiment_factor(1.0), 0.0);
    }

    #[test]
    fn test_final_score_formula() {
        let score = final_score(&signal(5, 3), 2, 0.0);
        assert_eq!(score, 5.0 + 4.0 + 1.5);
    }

    #[test]
    fn test_severe_keyword_overrides_calm_text() {
        for polarity in [-1.0, 0.0, 1.0] {
            for entities in 0..=3 {
                assert_eq!(
                    determine_priority(&signal(4, 4), entities, polarity),
                    PriorityTier::High
                );
            }
        }
    }

    #[test]
    fn test_score_thresholds() {
        // 9 + 0 + 3 = 12
        assert_eq!(determine_priority(&signal(9, 1), 0, -1.0), PriorityTier::High);
        // 8 + 0 + 3 = 11
        assert_eq!(determine_priority(&signal(8, 1), 0, -1.0), PriorityTier::Medium);
        // 3 + 2 + 1.5 = 6.5
        assert_eq!(determine_priority(&signal(3, 1), 1, 0.0), PriorityTier::Medium);
        // 1 + 0 + 1.5 = 2.5
        assert_eq!(determine_priority(&signal(1, 1), 0, 0.0), PriorityTier::Low);
        // 6 + 0 + 0 = 6
        assert_eq!(determine_priority(&signal(6, 1), 0, 1.0), PriorityTier::Medium);
    }

    #[test]
    fn test_medium_weight_keyword_lifts_to_medium() {
        assert_eq!(determine_priority(&signal(2, 2), 0, 1.0), PriorityTier::Medium);
    }

    #[test]
    fn test_entities_raise_priority() {
        // 8 + 0 + 1.5 = 9.5 vs 8 + 6 + 1.5 = 15.5
        assert_eq!(determine_priority(&signal(8, 3), 0, 0.0), PriorityTier::Medium);
        assert_eq!(determine_priority(&signal(8, 3), 3, 0.0), PriorityTier::High);
    }

    #[test]
    fn test_calculate_priority_success() {
        let complaint = complaint_with(
            ProcessingResult::Success(1),
            ProcessingResult::Success(-0.5),
            ProcessingResult::Success(signal(11, 3)),
        );
        assert_eq!(
            PriorityProcessor::new().calculate_priority(&complaint),
            ProcessingResult::Success(PriorityTier::High)
        );
    }

    #[test]
    fn test_degraded_estimator_falls_back_to_medium() {
        let cause = ProcessingError::SentimentAnalysis("offline".to_string());
        let complaint = complaint_with(
            ProcessingResult::Success(3),
            ProcessingResult::Degraded(0.0, cause.clone()),
            ProcessingResult::Success(signal(20, 4)),
        );
        assert_eq!(
            PriorityProcessor::new().calculate_priority(&complaint),
            ProcessingResult::Degraded(PriorityTier::Medium, cause)
        );
    }

    #[test]
    fn test_missing_input_falls_back_to_medium() {
        let complaint = complaint_with(
            ProcessingResult::Success(0),
            ProcessingResult::Processing,
            ProcessingResult::Success(signal(0, 0)),
        );
        assert!(matches!(
            PriorityProcessor::new().calculate_priority(&complaint),
            ProcessingResult::Degraded(
                PriorityTier::Medium,
                ProcessingError::PriorityCalculationError(_)
            )
        ));
    }
}
