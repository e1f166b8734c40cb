use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    complaint::{Department, ProcessedComplaint, ProcessingResult},
    lexicon::DepartmentLexicon,
    lexicon::Lexicons,
    pipeline::{ComplaintProcessor, FieldMask},
};

use super::normalize::normalize_text;

/// Points for a lexicon keyword found verbatim in the normalised text.
pub const DIRECT_MATCH_POINTS: u32 = 2;
/// Points for each extracted keyword that contains, or is contained by, a lexicon keyword.
pub const PARTIAL_MATCH_POINTS: u32 = 1;

pub struct DepartmentProcessor {
    lexicons: Arc<Lexicons>,
}

#[async_trait]
impl ComplaintProcessor for DepartmentProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "DepartmentProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let normalized = normalize_text(&complaint.complaint.content);
        // A degraded extractor leaves an empty set, so only direct matches count.
        let empty = BTreeSet::new();
        let keywords = complaint.keywords.value().unwrap_or(&empty);

        let department = classify_department(&self.lexicons.departments, &normalized, keywords);
        let result = complaint.with_department(ProcessingResult::Success(department));

        info!(
            "DepartmentProcessor finished processing complaint: {} -> {}",
            complaint_id, department
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::KEYWORDS
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::DEPARTMENT
    }
}

impl DepartmentProcessor {
    pub fn new(lexicons: Arc<Lexicons>) -> Self {
        Self { lexicons }
    }
}

/// Scores every department in lexicon order.
///
/// Direct and partial matches are counted independently, so a keyword that
/// appears verbatim and is also extracted scores both ways.
pub fn score_departments(
    lexicon: &DepartmentLexicon,
    normalized: &str,
    keywords: &BTreeSet<String>,
) -> Vec<(Department, u32)> {
    lexicon
        .entries()
        .iter()
        .map(|entry| {
            let score: u32 = entry
                .keywords
                .iter()
                .map(|lexicon_keyword| {
                    let direct = if normalized.contains(lexicon_keyword.as_str()) {
                        DIRECT_MATCH_POINTS
                    } else {
                        0
                    };
                    let partial = keywords
                        .iter()
                        .filter(|candidate| {
                            lexicon_keyword.contains(candidate.as_str())
                                || candidate.contains(lexicon_keyword.as_str())
                        })
                        .count() as u32
                        * PARTIAL_MATCH_POINTS;
                    direct + partial
                })
                .sum();
            (entry.department, score)
        })
        .collect()
}

/// Highest-scoring department; the earliest one wins a tie and a zero
/// score routes to `General`.
pub fn classify_department(
    lexicon: &DepartmentLexicon,
    normalized: &str,
    keywords: &BTreeSet<String>,
) -> Department {
    let scores = score_departments(lexicon, normalized, keywords);
    debug!("Department scores: {:?}", scores);

    let mut best: Option<(Department, u32)> = None;
    for (department, score) in scores {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((department, score));
        }
    }

    match best {
        Some((department, score)) if score > 0 => department,
        _ => Department::General,
    }
}
