use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingError {
    #[error("Failed to process the complaint: {0}")]
    ComplaintProcessingError(String),

    #[error("Invalid complaint data: {0}")]
    InvalidComplaintData(String),

    #[error("Failed to detect language")]
    LanguageDetectionError(),

    #[error("Linguistic tagging failed: {0}")]
    TaggingError(String),

    #[error("Sentiment analysis failed: {0}")]
    SentimentAnalysis(String),

    #[error("Classification error: {0}")]
    ClassificationError(String),

    #[error("Priority calculation failed: {0}")]
    PriorityCalculationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error occurred: {0}")]
    UnknownError(String),
}

impl From<serde_json::Error> for ProcessingError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
