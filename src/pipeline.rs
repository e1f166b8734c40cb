use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use bitflags::bitflags;
use chrono::Utc;
use futures::{FutureExt, future::join_all};
use log::{debug, error, info, warn};

use crate::{
    complaint::{ClassificationOutcome, Complaint, ProcessedComplaint},
    error::ProcessingError,
    lexicon::Lexicons,
    nlp::{SentimentAnalyzer, Tagger},
    processors::{
        department::DepartmentProcessor, entities::EntityProcessor, keywords::KeywordProcessor,
        language::LanguageProcessor, priority::PriorityProcessor, sentiment::SentimentProcessor,
        urgency::UrgencyProcessor,
    },
    report::AnalysisReport,
    validation::{LengthBounds, validate_complaint_text},
};

#[async_trait]
pub trait ComplaintProcessor: Sync + Send {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint;

    fn required_fields(&self) -> FieldMask;

    /// Returns the fields that this processor produces/updates
    fn output_fields(&self) -> FieldMask;
}

/// Runs processors in dependency waves until every produced field is set.
///
/// The pipeline holds no per-complaint state, so one instance can serve
/// any number of concurrent calls.
pub struct ComplaintPipeline {
    processors: Vec<Arc<dyn ComplaintProcessor>>,
    next_id: AtomicU64,
}

impl Default for ComplaintPipeline {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl ComplaintPipeline {
    pub fn with_processor(mut self, processor: Arc<dyn ComplaintProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// The full graph: language, keywords -> department, and entities,
    /// sentiment, urgency -> priority.
    pub fn standard(
        lexicons: Arc<Lexicons>,
        tagger: Arc<dyn Tagger>,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        ComplaintPipeline::default()
            .with_processor(Arc::new(LanguageProcessor))
            .with_processor(Arc::new(KeywordProcessor::new(Arc::clone(&tagger))))
            .with_processor(Arc::new(DepartmentProcessor::new(Arc::clone(&lexicons))))
            .with_processor(Arc::new(EntityProcessor::new(tagger)))
            .with_processor(Arc::new(SentimentProcessor::new(sentiment)))
            .with_processor(Arc::new(UrgencyProcessor::new(lexicons)))
            .with_processor(Arc::new(PriorityProcessor::new()))
    }

    fn expected_fields(&self) -> FieldMask {
        self.processors
            .iter()
            .fold(FieldMask::empty(), |mask, p| mask | p.output_fields())
    }

    pub async fn process_complaint(
        &self,
        complaint: Complaint,
    ) -> Result<ProcessedComplaint, ProcessingError> {
        if self.processors.is_empty() {
            return Err(ProcessingError::ComplaintProcessingError(
                "No processors configured".to_string(),
            ));
        }

        info!("Starting to process complaint: {}", complaint.id);
        let expected = self.expected_fields();
        let mut processed = ProcessedComplaint::new(complaint);

        loop {
            let current_fields = FieldMask::from(&processed);
            if current_fields.contains(expected) {
                break;
            }

            // Ready means every dependency is available and the processor's
            // own output has not been produced yet.
            let ready: Vec<&Arc<dyn ComplaintProcessor>> = self
                .processors
                .iter()
                .filter(|p| {
                    current_fields.contains(p.required_fields())
                        && !current_fields.intersects(p.output_fields())
                })
                .collect();

            if ready.is_empty() {
                let err = ProcessingError::ComplaintProcessingError(format!(
                    "Unsatisfiable processor dependencies: completed {:?}, expected {:?}",
                    current_fields, expected
                ));
                warn!(
                    "Failed to process complaint {}: {}",
                    processed.complaint.id, err
                );
                return Err(err);
            }

            debug!(
                "Complaint {}: running {} processor(s) with completed fields {:?}",
                processed.complaint.id,
                ready.len(),
                current_fields
            );
            let updates = join_all(ready.iter().map(|p| p.process(processed.clone()))).await;
            for update in updates {
                processed.merge_from(update);
            }

            if FieldMask::from(&processed) == current_fields {
                return Err(ProcessingError::ComplaintProcessingError(format!(
                    "Processors made no progress on complaint {}",
                    processed.complaint.id
                )));
            }
        }

        info!(
            "Successfully completed processing for complaint: {}",
            processed.complaint.id
        );
        Ok(processed)
    }

    /// Department and priority for one complaint text. Never fails: any
    /// pipeline error is reported through [`ClassificationOutcome::Fallback`].
    pub async fn classify(&self, text: &str) -> ClassificationOutcome {
        let id = format!("complaint-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            "Complaint {} text: {}",
            id,
            text.chars().take(100).collect::<String>()
        );

        if text.trim().is_empty() {
            let cause =
                ProcessingError::InvalidComplaintData("Complaint text is empty".to_string());
            warn!("Complaint {} classified with defaults: {}", id, cause);
            return ClassificationOutcome::fallback(cause);
        }

        let complaint = Complaint::new(id, text.to_string(), Utc::now());
        self.analyze(complaint).await.outcome
    }

    /// Runs the full pipeline and classifies the result. Errors and panics
    /// inside processors both end in [`ClassificationOutcome::Fallback`],
    /// in which case no processed complaint is returned.
    pub async fn analyze(&self, complaint: Complaint) -> Analysis {
        let id = complaint.id.clone();
        let run = AssertUnwindSafe(self.process_complaint(complaint))
            .catch_unwind()
            .await;

        let (outcome, processed) = match run {
            Ok(Ok(processed)) => (ClassificationOutcome::from(&processed), Some(processed)),
            Ok(Err(err)) => (ClassificationOutcome::fallback(err), None),
            Err(panic) => {
                let cause = ProcessingError::UnknownError(panic_message(panic.as_ref()));
                (ClassificationOutcome::fallback(cause), None)
            }
        };

        match &outcome {
            ClassificationOutcome::Fallback { cause, .. } => {
                error!("Error analyzing complaint {}: {}", id, cause)
            }
            ClassificationOutcome::Degraded { cause, .. } => {
                warn!("Complaint {} classified in degraded mode: {}", id, cause)
            }
            ClassificationOutcome::Classified(_) => {}
        }
        let classification = outcome.classification();
        info!(
            "Complaint {} assigned department {} ({}) and priority {} ({})",
            id,
            classification.department,
            classification.department_id(),
            classification.priority,
            classification.priority_score()
        );
        Analysis { outcome, processed }
    }

    /// Classifies every text concurrently; results keep the input order.
    pub async fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<ClassificationOutcome> {
        info!("Starting batch analysis of {} complaints", texts.len());
        let outcomes = join_all(texts.iter().map(|text| self.classify(text.as_ref()))).await;
        info!("Batch analysis completed");
        outcomes
    }

    /// Validates the text first, then classifies it into a web-layer report.
    pub async fn analyze_report(&self, text: &str, bounds: LengthBounds) -> AnalysisReport {
        match validate_complaint_text(text, bounds) {
            Ok(()) => AnalysisReport::from_outcome(&self.classify(text).await),
            Err(err) => {
                error!("Error processing complaint: {}", err);
                AnalysisReport::rejected(&err)
            }
        }
    }
}

/// Classification of one complaint plus the per-field results it was
/// derived from, when the pipeline got that far.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub outcome: ClassificationOutcome,
    pub processed: Option<ProcessedComplaint>,
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("Processor panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("Processor panicked: {message}")
    } else {
        "Processor panicked".to_string()
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldMask: u32 {
        const LANGUAGE = 0b0000_0001;
        const KEYWORDS = 0b0000_0010;
        const DEPARTMENT = 0b0000_0100;
        const ENTITIES = 0b0000_1000;
        const SENTIMENT = 0b0001_0000;
        const URGENCY = 0b0010_0000;
        const PRIORITY = 0b0100_0000;
    }
}

impl From<&ProcessedComplaint> for FieldMask {
    fn from(complaint: &ProcessedComplaint) -> Self {
        let mut mask = FieldMask::empty();
        mask.set(FieldMask::LANGUAGE, !complaint.language.is_processing());
        mask.set(FieldMask::KEYWORDS, !complaint.keywords.is_processing());
        mask.set(FieldMask::DEPARTMENT, !complaint.department.is_processing());
        mask.set(FieldMask::ENTITIES, !complaint.entities.is_processing());
        mask.set(FieldMask::SENTIMENT, !complaint.sentiment.is_processing());
        mask.set(FieldMask::URGENCY, !complaint.urgency.is_processing());
        mask.set(FieldMask::PRIORITY, !complaint.priority.is_processing());
        mask
    }
}
