use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}

impl Complaint {
    pub fn new(id: String, content: String, submitted_at: DateTime<Utc>) -> Self {
        Complaint {
            id,
            content,
            submitted_at,
        }
    }
}

/// State of one analysed field of a complaint.
///
/// `Degraded` holds the neutral value an estimator falls back to together
/// with the error that forced it, so callers can tell a real zero from a
/// masked failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingResult<T> {
    Processing,
    Success(T),
    Degraded(T, ProcessingError),
    Error(ProcessingError),
}

impl<T> ProcessingResult<T> {
    pub fn is_processing(&self) -> bool {
        matches!(self, ProcessingResult::Processing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ProcessingResult::Success(value) | ProcessingResult::Degraded(value, _) => Some(value),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&ProcessingError> {
        match self {
            ProcessingResult::Degraded(_, err) | ProcessingResult::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedComplaint {
    pub complaint: Complaint,
    /// ISO 639-3 code reported by the language detector.
    pub language: ProcessingResult<String>,
    pub keywords: ProcessingResult<BTreeSet<String>>,
    pub department: ProcessingResult<Department>,
    pub entities: ProcessingResult<u8>,
    pub sentiment: ProcessingResult<f32>,
    pub urgency: ProcessingResult<UrgencySignal>,
    pub priority: ProcessingResult<PriorityTier>,
}

impl ProcessedComplaint {
    pub fn new(complaint: Complaint) -> Self {
        ProcessedComplaint {
            complaint,
            language: ProcessingResult::Processing,
            keywords: ProcessingResult::Processing,
            department: ProcessingResult::Processing,
            entities: ProcessingResult::Processing,
            sentiment: ProcessingResult::Processing,
            urgency: ProcessingResult::Processing,
            priority: ProcessingResult::Processing,
        }
    }
    pub fn with_language(mut self, language: ProcessingResult<String>) -> Self {
        self.language = language;
        self
    }
    pub fn with_keywords(mut self, keywords: ProcessingResult<BTreeSet<String>>) -> Self {
        self.keywords = keywords;
        self
    }
    pub fn with_department(mut self, department: ProcessingResult<Department>) -> Self {
        self.department = department;
        self
    }
    pub fn with_entities(mut self, entities: ProcessingResult<u8>) -> Self {
        self.entities = entities;
        self
    }
    pub fn with_sentiment(mut self, sentiment: ProcessingResult<f32>) -> Self {
        self.sentiment = sentiment;
        self
    }
    pub fn with_urgency(mut self, urgency: ProcessingResult<UrgencySignal>) -> Self {
        self.urgency = urgency;
        self
    }
    pub fn with_priority(mut self, priority: ProcessingResult<PriorityTier>) -> Self {
        self.priority = priority;
        self
    }

    pub fn merge_from(&mut self, other: Self) {
        if !other.language.is_processing() {
            self.language = other.language;
        }
        if !other.keywords.is_processing() {
            self.keywords = other.keywords;
        }
        if !other.department.is_processing() {
            self.department = other.department;
        }
        if !other.entities.is_processing() {
            self.entities = other.entities;
        }
        if !other.sentiment.is_processing() {
            self.sentiment = other.sentiment;
        }
        if !other.urgency.is_processing() {
            self.urgency = other.urgency;
        }
        if !other.priority.is_processing() {
            self.priority = other.priority;
        }
    }
}

/// Departments a complaint can be routed to.
///
/// Ids are persisted by the complaint store and must never be renumbered.
/// Declaration order is also the tie-break order of the classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Department {
    Sanitation,
    Water,
    Infrastructure,
    #[serde(rename = "Public Safety")]
    PublicSafety,
    General,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Sanitation,
        Department::Water,
        Department::Infrastructure,
        Department::PublicSafety,
        Department::General,
    ];

    pub fn id(self) -> u8 {
        match self {
            Department::Sanitation => 1,
            Department::Water => 2,
            Department::Infrastructure => 3,
            Department::PublicSafety => 4,
            Department::General => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|department| department.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Department::Sanitation => "Sanitation",
            Department::Water => "Water",
            Department::Infrastructure => "Infrastructure",
            Department::PublicSafety => "Public Safety",
            Department::General => "General",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|department| department.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProcessingError::ConfigError(format!("Unknown department: {s}")))
    }
}

/// Urgency tiers; the numeric score is the value stored alongside a complaint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 3] = [
        PriorityTier::High,
        PriorityTier::Medium,
        PriorityTier::Low,
    ];

    pub fn score(self) -> u8 {
        match self {
            PriorityTier::Low => 1,
            PriorityTier::Medium => 2,
            PriorityTier::High => 3,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.score() == score)
    }

    pub fn name(self) -> &'static str {
        match self {
            PriorityTier::Low => "LOW",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::High => "HIGH",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriorityTier {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProcessingError::ConfigError(format!("Unknown priority tier: {s}")))
    }
}

/// Output of the urgency lexicon scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencySignal {
    pub score: u32,
    /// Largest single keyword weight matched; temporal phrases never raise it.
    pub max_weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub department: Department,
    pub priority: PriorityTier,
}

impl Classification {
    pub fn new(department: Department, priority: PriorityTier) -> Self {
        Classification {
            department,
            priority,
        }
    }

    pub fn department_id(&self) -> u8 {
        self.department.id()
    }

    pub fn priority_score(&self) -> u8 {
        self.priority.score()
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::new(Department::General, PriorityTier::Medium)
    }
}

/// What the core hands back for one complaint.
///
/// `Degraded` means some estimator was masked by its neutral value but the
/// rest of the pipeline ran; `Fallback` means nothing usable was produced
/// and the global defaults were returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassificationOutcome {
    Classified(Classification),
    Degraded {
        classification: Classification,
        cause: ProcessingError,
    },
    Fallback {
        classification: Classification,
        cause: ProcessingError,
    },
}

impl ClassificationOutcome {
    pub fn fallback(cause: ProcessingError) -> Self {
        ClassificationOutcome::Fallback {
            classification: Classification::default(),
            cause,
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            ClassificationOutcome::Classified(classification)
            | ClassificationOutcome::Degraded { classification, .. }
            | ClassificationOutcome::Fallback { classification, .. } => *classification,
        }
    }

    pub fn cause(&self) -> Option<&ProcessingError> {
        match self {
            ClassificationOutcome::Classified(_) => None,
            ClassificationOutcome::Degraded { cause, .. }
            | ClassificationOutcome::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ClassificationOutcome::Fallback { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ClassificationOutcome::Degraded { .. })
    }

    /// The `(department_id, priority_score)` pair handed to the persistence layer.
    pub fn ids(&self) -> (u8, u8) {
        let classification = self.classification();
        (classification.department_id(), classification.priority_score())
    }
}

impl From<&ProcessedComplaint> for ClassificationOutcome {
    fn from(processed: &ProcessedComplaint) -> Self {
        let (Some(department), Some(priority)) =
            (processed.department.value(), processed.priority.value())
        else {
            let cause = processed
                .department
                .cause()
                .or_else(|| processed.priority.cause())
                .cloned()
                .unwrap_or_else(|| {
                    ProcessingError::ComplaintProcessingError(
                        "Department or priority was never computed".to_string(),
                    )
                });
            return ClassificationOutcome::fallback(cause);
        };

        let classification = Classification::new(*department, *priority);
        let cause = processed
            .keywords
            .cause()
            .or_else(|| processed.department.cause())
            .or_else(|| processed.priority.cause());
        match cause {
            Some(cause) => ClassificationOutcome::Degraded {
                classification,
                cause: cause.clone(),
            },
            None => ClassificationOutcome::Classified(classification),
        }
    }
}
