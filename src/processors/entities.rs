use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::{
    complaint::{ProcessedComplaint, ProcessingResult},
    error::ProcessingError,
    nlp::{EntityLabel, TaggedDoc, Tagger},
    pipeline::{ComplaintProcessor, FieldMask},
};

/// Entity counts above this add nothing to the priority score.
pub const MAX_ENTITY_DENSITY: u8 = 3;

pub struct EntityProcessor {
    tagger: Arc<dyn Tagger>,
}

#[async_trait]
impl ComplaintProcessor for EntityProcessor {
    async fn process(&self, complaint: ProcessedComplaint) -> ProcessedComplaint {
        info!(
            "EntityProcessor received event for complaint: {}",
            complaint.complaint.id
        );

        let complaint_id = complaint.complaint.id.clone();
        let density = estimate_entity_density(self.tagger.as_ref(), &complaint.complaint.content);
        let entities = match density {
            Ok(density) => ProcessingResult::Success(density),
            Err(err) => {
                warn!(
                    "Entity estimation degraded for complaint {}: {}",
                    complaint_id, err
                );
                ProcessingResult::Degraded(0, err)
            }
        };
        let result = complaint.with_entities(entities);

        info!(
            "EntityProcessor finished processing complaint: {}",
            complaint_id
        );
        result
    }

    fn required_fields(&self) -> FieldMask {
        FieldMask::empty()
    }

    fn output_fields(&self) -> FieldMask {
        FieldMask::ENTITIES
    }
}

impl EntityProcessor {
    pub fn new(tagger: Arc<dyn Tagger>) -> Self {
        Self { tagger }
    }
}

pub fn estimate_entity_density(tagger: &dyn Tagger, text: &str) -> Result<u8, ProcessingError> {
    let doc = tagger.analyze(text)?;
    Ok(entity_density(&doc))
}

/// Person, organisation, geopolitical and location mentions, capped at
/// [`MAX_ENTITY_DENSITY`].
pub fn entity_density(doc: &TaggedDoc) -> u8 {
    let count = doc
        .entities
        .iter()
        .filter(|entity| {
            matches!(
                entity.label,
                EntityLabel::Person | EntityLabel::Org | EntityLabel::Gpe | EntityLabel::Loc
            )
        })
        .count();
    count.min(MAX_ENTITY_DENSITY as usize) as u8
}
