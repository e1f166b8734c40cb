//! Linguistic collaborators used by the processors.
//!
//! The processors only see the [`Tagger`] and [`SentimentAnalyzer`] traits.
//! [`RuleTagger`] and [`LexiconSentiment`] are the deterministic built-in
//! backends; a model-backed implementation can be swapped in through
//! `ComplaintPipeline::standard`.

pub mod sentiment;
pub mod tagger;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

pub use sentiment::LexiconSentiment;
pub use tagger::RuleTagger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Auxiliary,
    Numeral,
    Other,
}

impl PosTag {
    /// Open classes that carry the content of a complaint.
    pub fn is_content(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Verb | PosTag::Adjective)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
    pub is_stop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    Org,
    /// Geopolitical entity: city, country, district.
    Gpe,
    Loc,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedDoc {
    pub tokens: Vec<Token>,
    pub noun_chunks: Vec<String>,
    pub entities: Vec<EntitySpan>,
}

#[cfg_attr(test, automock)]
pub trait Tagger: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TaggedDoc, ProcessingError>;
}

#[cfg_attr(test, automock)]
pub trait SentimentAnalyzer: Send + Sync {
    /// Polarity in `[-1.0, 1.0]`; negative means negative affect.
    fn polarity(&self, text: &str) -> Result<f32, ProcessingError>;
}
