//! Deterministic department and priority triage for citizen complaints.
//!
//! [`pipeline::ComplaintPipeline::classify`] turns a complaint text into a
//! department id (1..=5) and a priority score (1..=3) using keyword lexicons,
//! part-of-speech features, named-entity density and sentiment polarity.

pub mod complaint;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod nlp;
pub mod pipeline;
pub mod processors;
pub mod report;
pub mod validation;
