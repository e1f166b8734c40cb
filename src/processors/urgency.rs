use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    complaint::{ProcessedComplaint, ProcessingResult, UrgencySignal},
    lexicon::{Lexicons, UrgencyLexicon},
    pipeline::{ComplaintProcessor, FieldMask},
};

pub struct UrgencyProcessor {
    lexicons: Arc<Lexicons>,
}

#[async_trait]
impl ComplaintProcessor for UrgencyProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "UrgencyProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let signal = score_urgency(&self.lexicons.urgency, &complaint.complaint.content);
        let result = complaint.with_urgency(ProcessingResult::Success(signal));

        info!(
            "UrgencyProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::empty()
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::URGENCY
    }
}

impl UrgencyProcessor {
    pub fn new(lexicons: Arc<Lexicons>) -> Self {
        Self { lexicons }
    }
}

/// Scans the lower-cased raw text. Punctuation is kept, so hyphenated
/// entries like "life-threatening" match literally.
pub fn score_urgency(lexicon: &UrgencyLexicon, text: &str) -> UrgencySignal {
    let text = text.to_lowercase();
    let mut signal = UrgencySignal::default();

    for tier in lexicon.tiers() {
        for keyword in &tier.keywords {
            if text.contains(keyword.keyword.as_str()) {
                debug!("Urgency keyword {:?} (+{})", keyword.keyword, keyword.weight);
                signal.score = signal.score.saturating_add(keyword.weight);
                signal.max_weight = signal.max_weight.max(keyword.weight);
            }
        }
    }

    for tier in lexicon.tiers() {
        let bonus = UrgencyLexicon::time_bonus(tier.tier);
        for phrase in &tier.time_indicators {
            if text.contains(phrase.as_str()) {
                debug!("Time indicator {:?} (+{})", phrase, bonus);
                signal.score = signal.score.saturating_add(bonus);
            }
        }
    }

    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{complaint::PriorityTier, lexicon::{UrgencyTier, WeightedKeyword}};

    fn score(text: &str) -> UrgencySignal {
        score_urgency(&UrgencyLexicon::default(), text)
    }

    #[test]
    fn test_no_keywords() {
        assert_eq!(score("the bus was late"), UrgencySignal::default());
        assert_eq!(score(""), UrgencySignal::default());
    }

    #[test]
    fn test_weights_accumulate_and_max_is_tracked() {
        // "urgent" is both a keyword (3) and a time indicator (+3)
        let signal = score("Urgent: broken pipe, minor flooding");
        assert_eq!(signal.max_weight, 3);
        assert_eq!(signal.score, 3 + 2 + 1 + 3 + 3);
    }

    #[test]
    fn test_time_indicators_do_not_raise_max_weight() {
        let signal = score("please come asap, sometime this week is too late");
        assert_eq!(signal.max_weight, 0);
        assert_eq!(signal.score, 3 + 2 + 1);
    }

    #[test]
    fn test_hyphenated_keyword_matches_literally() {
        let signal = score("A life-threatening gas smell");
        assert_eq!(signal.max_weight, 4);
        assert_eq!(signal.score, 4);

        let unhyphenated = score("a life threatening gas smell");
        assert_eq!(unhyphenated.max_weight, 0);
    }

    #[test]
    fn test_reference_complaint_signal() {
        let signal = score(
            "There is a dangerous water leak in the main pipeline on Park Street. \
             Water is flooding the area and causing traffic problems. \
             This needs immediate attention!",
        );
        // dangerous 3, immediate 3, problem 2, flood 3
        assert_eq!(signal.score, 11);
        assert_eq!(signal.max_weight, 3);
    }

    #[test]
    fn test_low_priority_sentence_signal() {
        let signal = score("minor issue with street light, will fix whenever");
        // minor 1, issue 2, fix 2, whenever +1
        assert_eq!(signal.score, 6);
        assert_eq!(signal.max_weight, 2);
    }

    #[test]
    fn test_oversized_weights_saturate() {
        let tiers = PriorityTier::ALL
            .into_iter()
            .map(|tier| UrgencyTier {
                tier,
                keywords: if tier == PriorityTier::High {
                    vec![
                        WeightedKeyword {
                            keyword: "fire".to_string(),
                            weight: u32::MAX,
                        },
                        WeightedKeyword {
                            keyword: "smoke".to_string(),
                            weight: u32::MAX,
                        },
                    ]
                } else {
                    vec![]
                },
                time_indicators: vec!["now".to_string()],
            })
            .collect();
        let lexicon = UrgencyLexicon::new(tiers).unwrap();

        let signal = score_urgency(&lexicon, "Fire and smoke, come now");
        assert_eq!(signal.score, u32::MAX);
        assert_eq!(signal.max_weight, u32::MAX);
    }
}
