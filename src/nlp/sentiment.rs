use std::collections::HashMap;

use crate::error::ProcessingError;

use super::SentimentAnalyzer;

const POLARITY: &[(&str, f32)] = &[
    // negative affect
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("poor", -0.4),
    ("dirty", -0.6),
    ("filthy", -0.8),
    ("disgusting", -1.0),
    ("smelly", -0.5),
    ("dangerous", -0.6),
    ("unsafe", -0.5),
    ("broken", -0.4),
    ("damaged", -0.4),
    ("blocked", -0.3),
    ("severe", -0.5),
    ("serious", -0.3),
    ("toxic", -0.7),
    ("angry", -0.5),
    ("frustrated", -0.6),
    ("frustrating", -0.6),
    ("disappointed", -0.75),
    ("annoying", -0.6),
    ("unacceptable", -0.8),
    ("useless", -0.5),
    ("sick", -0.7),
    ("scared", -0.6),
    ("afraid", -0.6),
    ("worried", -0.4),
    ("sad", -0.5),
    ("hate", -0.8),
    ("never", -0.2),
    ("problem", -0.2),
    ("problems", -0.2),
    ("fail", -0.5),
    ("failed", -0.5),
    ("negligence", -0.6),
    ("ignored", -0.4),
    ("late", -0.3),
    ("slow", -0.3),
    ("noisy", -0.4),
    ("dark", -0.15),
    ("stagnant", -0.4),
    ("overflowing", -0.4),
    // positive affect
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("nice", 0.6),
    ("clean", 0.37),
    ("safe", 0.5),
    ("happy", 0.8),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("helpful", 0.5),
    ("quick", 0.33),
    ("fine", 0.4),
    ("satisfied", 0.5),
    ("appreciate", 0.5),
    ("wonderful", 1.0),
    ("love", 0.5),
    ("better", 0.5),
    ("best", 1.0),
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("so", 1.2),
    ("too", 1.2),
    ("totally", 1.4),
    ("completely", 1.4),
    ("highly", 1.4),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "isn't", "wasn't", "aren't", "won't", "can't", "cannot", "don't",
    "doesn't", "didn't", "without",
];

/// A negator within this many preceding words flips a polar word.
const NEGATION_WINDOW: usize = 3;

/// Negated words keep half their magnitude with the sign reversed.
const NEGATION_FACTOR: f32 = -0.5;

/// Word-polarity sentiment analyzer.
///
/// The score is the mean polarity of the polar words found, each scaled by
/// a preceding intensifier and flipped by a nearby negator. Text without
/// polar words scores `0.0`.
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    polarity: HashMap<String, f32>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    pub fn new() -> Self {
        Self::with_lexicon(POLARITY.iter().map(|(w, p)| (w.to_string(), *p)))
    }

    pub fn with_lexicon(entries: impl IntoIterator<Item = (String, f32)>) -> Self {
        LexiconSentiment {
            polarity: entries
                .into_iter()
                .map(|(word, polarity)| (word.to_lowercase(), polarity.clamp(-1.0, 1.0)))
                .collect(),
        }
    }

    fn word_polarity(&self, words: &[String], i: usize) -> Option<f32> {
        let mut score = *self.polarity.get(&words[i])?;

        if let Some(prev) = i.checked_sub(1).map(|p| words[p].as_str()) {
            if let Some((_, factor)) = INTENSIFIERS.iter().find(|(w, _)| *w == prev) {
                score *= factor;
            }
        }

        let window = i.saturating_sub(NEGATION_WINDOW)..i;
        if words[window].iter().any(|w| NEGATORS.contains(&w.as_str())) {
            score *= NEGATION_FACTOR;
        }
        Some(score)
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn polarity(&self, text: &str) -> Result<f32, ProcessingError> {
        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let hits: Vec<f32> = (0..words.len())
            .filter_map(|i| self.word_polarity(&words, i))
            .collect();

        if hits.is_empty() {
            return Ok(0.0);
        }
        let mean = hits.iter().sum::<f32>() / hits.len() as f32;
        Ok(mean.clamp(-1.0, 1.0))
    }
}
