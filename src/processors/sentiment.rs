use std::sync::Arc;

use crate::{
    complaint::{ProcessedComplaint, ProcessingResult},
    error::ProcessingError,
    nlp::SentimentAnalyzer,
    pipeline::{ComplaintProcessor, FieldMask},
};
use async_trait::async_trait;
use log::{info, warn};

pub struct SentimentProcessor {
    analyzer: Arc<dyn SentimentAnalyzer>,
}

#[async_trait]
impl ComplaintProcessor for SentimentProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "SentimentProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let sentiment = match self.analyze_sentiment(&complaint.complaint.content) {
            Ok(polarity) => ProcessingResult::Success(polarity),
            Err(err) => {
                warn!(
                    "Sentiment analysis degraded for complaint {}: {}",
                    complaint_id, err
                );
                ProcessingResult::Degraded(0.0, err)
            }
        };
        let result = complaint.with_sentiment(sentiment);

        info!(
            "SentimentProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::empty()
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::SENTIMENT
    }
}

impl SentimentProcessor {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }

    fn analyze_sentiment(&self, text: &str) -> Result<f32, ProcessingError> {
        let polarity = self.analyzer.polarity(text)?;
        if !polarity.is_finite() {
            return Err(ProcessingError::SentimentAnalysis(format!(
                "Analyzer returned non-finite polarity {polarity}"
            )));
        }
        Ok(polarity.clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::Complaint;
    use crate::nlp::MockSentimentAnalyzer;
    use chrono::Utc;

    fn complaint(text: &str) -> ProcessedComplaint {
        ProcessedComplaint::new(Complaint::new(
            "c-1".to_string(),
            text.to_string(),
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn test_polarity_is_recorded() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_polarity().returning(|_| Ok(-0.4));
        let processor = SentimentProcessor::new(Arc::new(analyzer));

        let processed = processor.process(complaint("the road is awful")).await;
        assert_eq!(processed.sentiment, ProcessingResult::Success(-0.4));
    }

    #[tokio::test]
    async fn test_out_of_range_polarity_is_clamped() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_polarity().returning(|_| Ok(-3.0));
        let processor = SentimentProcessor::new(Arc::new(analyzer));

        let processed = processor.process(complaint("awful")).await;
        assert_eq!(processed.sentiment, ProcessingResult::Success(-1.0));
    }

    #[tokio::test]
    async fn test_failure_degrades_to_neutral() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer
            .expect_polarity()
            .returning(|_| Err(ProcessingError::SentimentAnalysis("offline".to_string())));
        let processor = SentimentProcessor::new(Arc::new(analyzer));

        let processed = processor.process(complaint("awful")).await;
        assert_eq!(processed.sentiment.value(), Some(&0.0));
        assert!(processed.sentiment.cause().is_some());
    }

    #[tokio::test]
    async fn test_nan_is_treated_as_failure() {
        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_polarity().returning(|_| Ok(f32::NAN));
        let processor = SentimentProcessor::new(Arc::new(analyzer));

        let processed = processor.process(complaint("???")).await;
        assert!(matches!(
            processed.sentiment,
            ProcessingResult::Degraded(_, ProcessingError::SentimentAnalysis(_))
        ));
    }
}
