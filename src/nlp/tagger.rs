//! Rule-based English tagger.
//!
//! Closed word classes come from fixed lists, open classes from suffix and
//! context heuristics. Noun chunks are `(DET)? (ADJ|NOUN|NUM)* NOUN` runs
//! inside a clause. Entities are runs of capitalised words labelled by
//! honorific, organisation suffix, place suffix or a preceding locative
//! preposition.

use std::{collections::HashSet, sync::LazyLock};

use crate::error::ProcessingError;

use super::{EntityLabel, EntitySpan, PosTag, TaggedDoc, Tagger, Token};

static DETERMINERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
        "another", "such", "all", "both", "either", "neither",
    ])
});

static PRONOUNS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "my", "mine",
        "your", "yours", "his", "her", "hers", "its", "our", "ours", "their", "theirs", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who", "whom",
        "whose", "which", "what", "someone", "anyone", "everyone", "nobody", "something",
        "anything", "everything", "nothing",
    ])
});

static POSSESSIVES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from(["my", "your", "his", "her", "its", "our", "their"])
});

static PREPOSITIONS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "to", "from", "up", "down", "of", "off",
        "over", "under", "near", "behind", "beside", "across", "along", "around", "outside",
        "inside", "since", "until", "within", "without", "per", "via", "towards", "toward",
    ])
});

static CONJUNCTIONS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "while", "if",
        "unless", "whether", "whereas", "than",
    ])
});

static AUXILIARIES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "having",
        "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
        "must", "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "won't",
        "can't", "cannot", "couldn't", "shouldn't",
    ])
});

static ADVERBS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "not", "very", "also", "now", "here", "there", "always", "never", "often", "again",
        "already", "still", "just", "too", "soon", "whenever", "sometime", "eventually", "then",
        "when", "where", "why", "how", "quite", "almost", "really", "even", "ever", "once",
        "today", "tomorrow", "yesterday", "tonight", "asap", "away", "please", "well", "only",
    ])
});

static NUMBER_WORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "twenty", "hundred", "thousand", "first", "second", "third",
    ])
});

static KNOWN_ADJECTIVES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "main", "minor", "major", "big", "small", "large", "huge", "old", "new", "bad", "good",
        "poor", "great", "dirty", "clean", "broken", "urgent", "immediate", "severe", "serious",
        "critical", "toxic", "unsafe", "safe", "public", "local", "open", "blocked", "dark",
        "slight", "normal", "regular", "common", "basic", "standard", "usual", "typical",
        "important", "significant", "moderate", "necessary", "low", "high", "deep", "full",
        "empty", "wet", "dry", "hot", "cold", "loud", "constant", "frequent", "daily", "whole",
        "same", "other", "several", "many", "much", "few",
    ])
});

static KNOWN_VERBS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "need", "needs", "fix", "fixes", "get", "gets", "got", "make", "makes", "made", "take",
        "takes", "took", "come", "comes", "came", "go", "goes", "went", "gone", "see", "saw",
        "seen", "burst", "bursts", "smell", "smells", "overflow", "overflows", "collapse",
        "collapsed", "complain", "complained", "report", "reported", "request", "stop", "stopped",
        "block", "clean", "help", "keep", "keeps", "say", "says", "said", "know", "think", "want",
        "wants", "try", "tried", "call", "called",
    ])
});

/// spaCy-style English stop words, reduced to what complaint text uses.
static STOP_WORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "a", "about", "above", "after", "again", "against", "all", "almost", "also", "although",
        "always", "am", "among", "an", "and", "another", "any", "anyone", "anything", "are",
        "around", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
        "down", "during", "each", "either", "else", "even", "ever", "every", "everyone",
        "everything", "few", "for", "from", "further", "get", "had", "has", "have", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
        "into", "is", "it", "its", "itself", "just", "last", "least", "less", "made", "make",
        "many", "may", "me", "might", "mine", "more", "most", "much", "must", "my", "myself",
        "neither", "never", "no", "nobody", "none", "nor", "not", "nothing", "now", "of", "off",
        "often", "on", "once", "only", "or", "other", "others", "our", "ours", "ourselves", "out",
        "over", "own", "per", "please", "put", "quite", "rather", "really", "same", "say", "see",
        "several", "she", "should", "since", "so", "some", "someone", "something", "sometime",
        "still", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
        "there", "these", "they", "this", "those", "though", "through", "to", "too", "toward",
        "towards", "under", "unless", "until", "up", "upon", "us", "very", "via", "was", "we",
        "well", "were", "what", "whatever", "when", "whenever", "where", "whether", "which",
        "while", "who", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself",
    ])
});

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ical", "ish"];

static HONORIFICS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from(["mr", "mrs", "ms", "miss", "dr", "prof", "sir", "madam", "shri", "smt"])
});

/// Abbreviations whose trailing period does not end a sentence.
static ABBREVIATIONS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from(["mr", "mrs", "ms", "dr", "prof", "st", "rd", "ave", "no", "shri", "smt"])
});

static ORG_SUFFIXES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "council", "corporation", "department", "authority", "board", "municipality", "office",
        "agency", "committee", "company", "inc", "ltd", "llc", "corp", "bank", "hospital",
        "school", "university", "college", "police", "ministry", "commission", "trust",
    ])
});

static LOC_SUFFIXES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from([
        "street", "st", "road", "rd", "avenue", "ave", "lane", "park", "bridge", "river", "lake",
        "market", "square", "colony", "nagar", "sector", "highway", "drive", "boulevard",
        "station", "junction", "circle", "block", "layout", "chowk", "bazaar",
    ])
});

static LOC_PREPOSITIONS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from(["in", "at", "near", "from", "around", "across"])
});

/// Entity runs may bridge one lower-case connector between capitalised words.
static CONNECTORS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    HashSet::from(["of", "and", "de"])
});

const SENTENCE_END: &[char] = &['.', '!', '?', '\n'];
const CLAUSE_BREAK: &[char] = &[',', ';', ':', '(', ')', '"', '[', ']'];

#[derive(Debug, Clone, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        RuleTagger
    }
}

impl Tagger for RuleTagger {
    fn analyze(&self, text: &str) -> Result<TaggedDoc, ProcessingError> {
        let mut doc = TaggedDoc::default();

        for segment in segments(text) {
            let lowered: Vec<String> = segment.words.iter().map(|w| w.to_lowercase()).collect();
            let tags = tag_segment(&segment, &lowered);

            doc.noun_chunks.extend(noun_chunks(&segment.words, &lowered, &tags));
            doc.entities.extend(entities(&segment, &lowered));

            let tokens = segment.words.iter().zip(&lowered).zip(tags);
            doc.tokens.extend(tokens.map(|((word, lower), pos)| Token {
                text: word.to_string(),
                pos,
                is_stop: STOP_WORDS.contains(lower.as_str()),
            }));
        }

        Ok(doc)
    }
}

/// A run of words with no sentence or clause punctuation inside it.
#[derive(Debug)]
struct Segment<'a> {
    words: Vec<&'a str>,
    starts_sentence: bool,
}

fn is_boundary(c: char) -> bool {
    SENTENCE_END.contains(&c) || CLAUSE_BREAK.contains(&c)
}

fn words_of(piece: &str) -> impl Iterator<Item = &str> {
    piece
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|w| w.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
}

fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut pending_start = true;
    let mut next_start = true;

    for piece in text.split_inclusive(is_boundary) {
        if pending.is_empty() {
            pending_start = next_start;
        }
        let before = pending.len();
        pending.extend(words_of(piece));
        let added = pending.len() > before;

        let Some(terminator) = piece.chars().last().filter(|c| is_boundary(*c)) else {
            continue;
        };
        let abbreviated = terminator == '.'
            && added
            && pending
                .last()
                .is_some_and(|w| ABBREVIATIONS.contains(&w.to_lowercase().as_str()));
        if abbreviated {
            continue;
        }

        if !pending.is_empty() {
            segments.push(Segment {
                words: std::mem::take(&mut pending),
                starts_sentence: pending_start,
            });
            next_start = SENTENCE_END.contains(&terminator);
        } else if SENTENCE_END.contains(&terminator) {
            next_start = true;
        }
    }

    if !pending.is_empty() {
        segments.push(Segment {
            words: pending,
            starts_sentence: pending_start,
        });
    }
    segments
}

fn tag_segment(segment: &Segment<'_>, lowered: &[String]) -> Vec<PosTag> {
    let mut tags: Vec<PosTag> = Vec::with_capacity(lowered.len());
    for (i, lower) in lowered.iter().enumerate() {
        let prev_tag = tags.last().copied();
        let prev_word = i.checked_sub(1).map(|p| lowered[p].as_str());
        let mut tag = tag_word(lower, prev_tag, prev_word);

        let sentence_initial = i == 0 && segment.starts_sentence;
        if tag == PosTag::Noun && !sentence_initial && is_capitalized(segment.words[i]) {
            tag = PosTag::ProperNoun;
        }
        tags.push(tag);
    }
    tags
}

fn tag_word(lower: &str, prev_tag: Option<PosTag>, prev_word: Option<&str>) -> PosTag {
    let word = lower;
    if DETERMINERS.contains(&word) {
        return PosTag::Determiner;
    }
    if PRONOUNS.contains(&word) {
        return PosTag::Pronoun;
    }
    if PREPOSITIONS.contains(&word) {
        return PosTag::Preposition;
    }
    if CONJUNCTIONS.contains(&word) {
        return PosTag::Conjunction;
    }
    if AUXILIARIES.contains(&word) {
        return PosTag::Auxiliary;
    }
    if NUMBER_WORDS.contains(&word) || word.chars().all(|c| c.is_ascii_digit()) {
        return PosTag::Numeral;
    }
    if ADVERBS.contains(&word) {
        return PosTag::Adverb;
    }
    if KNOWN_ADJECTIVES.contains(&word) {
        return PosTag::Adjective;
    }

    let after_determiner = matches!(prev_tag, Some(PosTag::Determiner | PosTag::Adjective))
        || prev_word.is_some_and(|w| POSSESSIVES.contains(&w));
    let after_verb_marker =
        matches!(prev_tag, Some(PosTag::Auxiliary)) || matches!(prev_word, Some("to" | "please"));

    if KNOWN_VERBS.contains(&word) {
        // "this needs", "the pipe bursts": inflected forms stay verbs after a nominal.
        let inflected = word.ends_with('s') || word.ends_with("ed");
        let nominal = after_determiner || matches!(prev_tag, Some(PosTag::Noun));
        return if nominal && !inflected {
            PosTag::Noun
        } else {
            PosTag::Verb
        };
    }

    let len = word.chars().count();
    if len > 4 && word.ends_with("ly") {
        return PosTag::Adverb;
    }
    if len > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return PosTag::Adjective;
    }
    if (len > 5 && word.ends_with("ing")) || (len > 4 && word.ends_with("ed")) {
        return if after_determiner { PosTag::Noun } else { PosTag::Verb };
    }
    if after_verb_marker {
        return PosTag::Verb;
    }
    PosTag::Noun
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn noun_chunks(words: &[&str], lowered: &[String], tags: &[PosTag]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < tags.len() {
        let start = i;
        let mut j = i;
        if tags[j] == PosTag::Determiner || POSSESSIVES.contains(&lowered[j].as_str()) {
            j += 1;
        }

        let mut last_noun = None;
        while j < tags.len()
            && matches!(
                tags[j],
                PosTag::Adjective | PosTag::Noun | PosTag::ProperNoun | PosTag::Numeral
            )
        {
            if matches!(tags[j], PosTag::Noun | PosTag::ProperNoun) {
                last_noun = Some(j);
            }
            j += 1;
        }

        match last_noun {
            Some(end) => {
                chunks.push(words[start..=end].join(" "));
                i = end + 1;
            }
            None => i = start + 1,
        }
    }
    chunks
}

fn entities(segment: &Segment<'_>, lowered: &[String]) -> Vec<EntitySpan> {
    let words = &segment.words;
    let mut spans = Vec::new();
    let mut k = 0;

    while k < words.len() {
        if !is_capitalized(words[k]) {
            k += 1;
            continue;
        }

        let mut end = k;
        while end + 1 < words.len() {
            if is_capitalized(words[end + 1]) {
                end += 1;
            } else if end + 2 < words.len()
                && CONNECTORS.contains(&lowered[end + 1].as_str())
                && is_capitalized(words[end + 2])
            {
                end += 2;
            } else {
                break;
            }
        }

        let run_start = k;
        k = end + 1;

        let mut start = run_start;
        while start <= end && STOP_WORDS.contains(&lowered[start].as_str()) {
            start += 1;
        }
        if start > end {
            continue;
        }

        let first = lowered[start].as_str();
        let last = lowered[end].as_str();
        let single = start == end;
        let sentence_initial = run_start == 0 && segment.starts_sentence;
        if single && sentence_initial && !HONORIFICS.contains(&first) {
            continue;
        }
        if single && HONORIFICS.contains(&first) {
            continue;
        }

        let label = if HONORIFICS.contains(&first) {
            EntityLabel::Person
        } else if ORG_SUFFIXES.contains(&last) {
            EntityLabel::Org
        } else if LOC_SUFFIXES.contains(&last) {
            EntityLabel::Loc
        } else if start > 0 && LOC_PREPOSITIONS.contains(&lowered[start - 1].as_str()) {
            EntityLabel::Gpe
        } else if !single {
            EntityLabel::Person
        } else {
            EntityLabel::Other
        };

        spans.push(EntitySpan {
            text: words[start..=end].join(" "),
            label,
        });
    }
    spans
}
