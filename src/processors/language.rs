use crate::{
    complaint::{ProcessedComplaint, ProcessingResult},
    error::ProcessingError,
    pipeline::{ComplaintProcessor, FieldMask},
};
use async_trait::async_trait;
use log::{info, warn};
use whatlang::{Lang, detect};

/// Reports the complaint language. Lexicons and tagger are English-only, so
/// other languages are logged and still classified.
pub struct LanguageProcessor;

#[async_trait]
impl ComplaintProcessor for LanguageProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "LanguageProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let language = match detect(&complaint.complaint.content) {
            Some(info) => {
                if info.lang() != Lang::Eng && info.is_reliable() {
                    warn!(
                        "Complaint {} looks like {} text; keyword lexicons are English-only",
                        complaint_id,
                        info.lang().eng_name()
                    );
                }
                ProcessingResult::Success(info.lang().code().to_string())
            }
            None => ProcessingResult::Error(ProcessingError::LanguageDetectionError()),
        };
        let result = complaint.with_language(language);

        info!(
            "LanguageProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::empty()
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::LANGUAGE
    }
}
