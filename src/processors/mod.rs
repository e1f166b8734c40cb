pub mod department;
pub mod entities;
pub mod keywords;
pub mod language;
pub mod normalize;
pub mod priority;
pub mod sentiment;
pub mod urgency;
