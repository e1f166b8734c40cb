use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use log::{info, warn};

use crate::{
    complaint::{ProcessedComplaint, ProcessingResult},
    error::ProcessingError,
    nlp::Tagger,
    pipeline::{ComplaintProcessor, FieldMask},
};

use super::normalize::normalize_text;

/// Content-bearing words and noun phrases of the normalised complaint.
pub struct KeywordProcessor {
    tagger: Arc<dyn Tagger>,
}

#[async_trait]
impl ComplaintProcessor for KeywordProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "KeywordProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let normalized = normalize_text(&complaint.complaint.content);
        let keywords = match extract_keywords(self.tagger.as_ref(), &normalized) {
            Ok(keywords) => ProcessingResult::Success(keywords),
            Err(err) => {
                warn!(
                    "Keyword extraction degraded for complaint {}: {}",
                    complaint_id, err
                );
                ProcessingResult::Degraded(BTreeSet::new(), err)
            }
        };
        let result = complaint.with_keywords(keywords);

        info!(
            "KeywordProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::empty()
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::KEYWORDS
    }
}

impl KeywordProcessor {
    pub fn new(tagger: Arc<dyn Tagger>) -> Self {
        Self { tagger }
    }
}

/// Non-stop nouns, verbs and adjectives plus every noun chunk, case-folded
/// and deduplicated.
pub fn extract_keywords(
    tagger: &dyn Tagger,
    normalized: &str,
) -> Result<BTreeSet<String>, ProcessingError> {
    let doc = tagger.analyze(normalized)?;

    let words = doc
        .tokens
        .iter()
        .filter(|token| token.pos.is_content() && !token.is_stop)
        .map(|token| token.text.to_lowercase());
    let chunks = doc.noun_chunks.iter().map(|chunk| chunk.to_lowercase());

    Ok(words
        .chain(chunks)
        .filter(|keyword| !keyword.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::Complaint;
    use crate::nlp::{MockTagger, PosTag, RuleTagger, TaggedDoc, Token};
    use chrono::Utc;

    fn token(text: &str, pos: PosTag, is_stop: bool) -> Token {
        Token {
            text: text.to_string(),
            pos,
            is_stop,
        }
    }

    #[test]
    fn test_extract_filters_by_pos_and_stop_words() {
        let mut tagger = MockTagger::new();
        tagger.expect_analyze().returning(|_| {
            Ok(TaggedDoc {
                tokens: vec![
                    token("the", PosTag::Determiner, true),
                    token("Garbage", PosTag::Noun, false),
                    token("smells", PosTag::Verb, false),
                    token("really", PosTag::Adverb, true),
                    token("bad", PosTag::Adjective, false),
                    token("get", PosTag::Verb, true),
                ],
                noun_chunks: vec!["the Garbage".to_string(), "garbage".to_string()],
                entities: vec![],
            })
        });

        let keywords = extract_keywords(&tagger, "the garbage smells really bad").unwrap();
        let expected: BTreeSet<String> = ["garbage", "smells", "bad", "the garbage"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keywords, expected);
    }

    #[test]
    fn test_extract_with_rule_tagger() {
        let keywords = extract_keywords(
            &RuleTagger::new(),
            "there is a dangerous water leak in the main pipeline",
        )
        .unwrap();
        assert!(keywords.contains("water"));
        assert!(keywords.contains("leak"));
        assert!(keywords.contains("pipeline"));
        assert!(keywords.contains("a dangerous water leak"));
        assert!(!keywords.contains("there"));
        assert!(!keywords.contains("the"));
    }

    #[tokio::test]
    async fn test_tagger_failure_degrades_to_empty_set() {
        let mut tagger = MockTagger::new();
        tagger
            .expect_analyze()
            .returning(|_| Err(ProcessingError::TaggingError("model not loaded".to_string())));
        let processor = KeywordProcessor::new(Arc::new(tagger));

        let complaint = ProcessedComplaint::new(Complaint::new(
            "c-1".to_string(),
            "Overflowing garbage bins".to_string(),
            Utc::now(),
        ));
        let processed = processor.process(complaint).await;

        assert_eq!(processed.keywords.value(), Some(&BTreeSet::new()));
        assert!(matches!(
            processed.keywords.cause(),
            Some(ProcessingError::TaggingError(_))
        ));
    }
}
