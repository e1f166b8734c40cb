use std::{fs, path::Path};

use log::info;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    complaint::{Department, PriorityTier},
    error::ProcessingError,
};

const SANITATION_KEYWORDS: &[&str] = &[
    "garbage",
    "waste",
    "trash",
    "sewage",
    "drainage",
    "cleaning",
    "sanitation",
    "hygiene",
    "dump",
    "litter",
    "cleanliness",
    "waste management",
    "sewerage",
    "garbage collection",
];

const WATER_KEYWORDS: &[&str] = &[
    "water",
    "pipeline",
    "leakage",
    "tap",
    "supply",
    "drinking water",
    "water pressure",
    "contamination",
    "water quality",
    "pipe burst",
    "water connection",
    "water supply",
    "water shortage",
];

const INFRASTRUCTURE_KEYWORDS: &[&str] = &[
    "road",
    "street",
    "footpath",
    "building",
    "construction",
    "repair",
    "maintenance",
    "bridge",
    "pavement",
    "pothole",
    "street light",
    "traffic signal",
    "infrastructure",
    "public property",
];

const PUBLIC_SAFETY_KEYWORDS: &[&str] = &[
    "safety",
    "security",
    "crime",
    "accident",
    "emergency",
    "police",
    "traffic",
    "violation",
    "harassment",
    "danger",
    "threat",
    "street light",
    "public safety",
    "law enforcement",
];

const GENERAL_KEYWORDS: &[&str] = &[
    "general",
    "other",
    "miscellaneous",
    "complaint",
    "issue",
    "problem",
    "concern",
    "query",
    "request",
    "assistance",
];

const HIGH_URGENCY: &[(&str, u32)] = &[
    ("immediate", 3),
    ("urgent", 3),
    ("emergency", 3),
    ("dangerous", 3),
    ("critical", 3),
    ("severe", 3),
    ("serious", 3),
    ("hazard", 3),
    ("life-threatening", 4),
    ("accident", 3),
    ("disaster", 4),
    ("death", 4),
    ("dying", 4),
    ("collapse", 3),
    ("explosion", 4),
    ("fire", 4),
    ("flood", 3),
    ("toxic", 4),
    ("poison", 4),
    ("unsafe", 3),
];

const MEDIUM_URGENCY: &[(&str, u32)] = &[
    ("important", 2),
    ("significant", 2),
    ("moderate", 2),
    ("needed", 2),
    ("required", 2),
    ("necessary", 2),
    ("concern", 2),
    ("issue", 2),
    ("problem", 2),
    ("repair", 2),
    ("fix", 2),
    ("broken", 2),
    ("damaged", 2),
    ("leaking", 2),
    ("malfunction", 2),
];

const LOW_URGENCY: &[(&str, u32)] = &[
    ("minor", 1),
    ("small", 1),
    ("slight", 1),
    ("routine", 1),
    ("regular", 1),
    ("normal", 1),
    ("standard", 1),
    ("basic", 1),
    ("general", 1),
    ("common", 1),
    ("usual", 1),
    ("typical", 1),
];

const HIGH_TIME_INDICATORS: &[&str] = &[
    "immediately",
    "urgent",
    "asap",
    "emergency",
    "right now",
    "right away",
];
const MEDIUM_TIME_INDICATORS: &[&str] = &["soon", "this week", "next few days"];
const LOW_TIME_INDICATORS: &[&str] = &["whenever", "sometime", "eventually", "when possible"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DepartmentKeywords {
    pub department: Department,
    pub keywords: Vec<String>,
}

/// Keyword table per department, kept in `Department::ALL` order so the
/// first entry wins a tied score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DepartmentLexicon {
    entries: Vec<DepartmentKeywords>,
}

impl DepartmentLexicon {
    pub fn new(entries: Vec<DepartmentKeywords>) -> Result<Self, ProcessingError> {
        let lexicon = DepartmentLexicon {
            entries: entries
                .into_iter()
                .map(|entry| DepartmentKeywords {
                    department: entry.department,
                    keywords: fold_keywords(entry.keywords),
                })
                .collect(),
        };
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn entries(&self) -> &[DepartmentKeywords] {
        &self.entries
    }

    pub fn keywords(&self, department: Department) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.department == department)
            .map(|entry| entry.keywords.as_slice())
            .unwrap_or(&[])
    }

    fn validate(&self) -> Result<(), ProcessingError> {
        let order: Vec<Department> = self.entries.iter().map(|e| e.department).collect();
        if order != Department::ALL {
            return Err(ProcessingError::ConfigError(format!(
                "Department lexicon must list {:?} exactly once in that order, got {:?}",
                Department::ALL,
                order
            )));
        }
        let blank = self
            .entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| k.trim().is_empty()));
        if let Some(entry) = blank {
            return Err(ProcessingError::ConfigError(format!(
                "Blank keyword in department {}",
                entry.department
            )));
        }
        Ok(())
    }
}

impl Default for DepartmentLexicon {
    fn default() -> Self {
        let table: [(Department, &[&str]); 5] = [
            (Department::Sanitation, SANITATION_KEYWORDS),
            (Department::Water, WATER_KEYWORDS),
            (Department::Infrastructure, INFRASTRUCTURE_KEYWORDS),
            (Department::PublicSafety, PUBLIC_SAFETY_KEYWORDS),
            (Department::General, GENERAL_KEYWORDS),
        ];
        DepartmentLexicon {
            entries: table
                .into_iter()
                .map(|(department, keywords)| DepartmentKeywords {
                    department,
                    keywords: to_strings(keywords),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightedKeyword {
    pub keyword: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UrgencyTier {
    pub tier: PriorityTier,
    pub keywords: Vec<WeightedKeyword>,
    /// Temporal phrases such as "right away"; each hit adds the tier bonus.
    pub time_indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UrgencyLexicon {
    tiers: Vec<UrgencyTier>,
}

impl UrgencyLexicon {
    pub fn new(tiers: Vec<UrgencyTier>) -> Result<Self, ProcessingError> {
        let lexicon = UrgencyLexicon {
            tiers: tiers
                .into_iter()
                .map(|tier| UrgencyTier {
                    tier: tier.tier,
                    keywords: tier
                        .keywords
                        .into_iter()
                        .map(|k| WeightedKeyword {
                            keyword: k.keyword.to_lowercase(),
                            weight: k.weight,
                        })
                        .collect(),
                    time_indicators: fold_keywords(tier.time_indicators),
                })
                .collect(),
        };
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn tiers(&self) -> &[UrgencyTier] {
        &self.tiers
    }

    /// Score added for every temporal phrase of `tier` found in the text.
    pub fn time_bonus(tier: PriorityTier) -> u32 {
        match tier {
            PriorityTier::High => 3,
            PriorityTier::Medium => 2,
            PriorityTier::Low => 1,
        }
    }

    fn validate(&self) -> Result<(), ProcessingError> {
        for tier in PriorityTier::ALL {
            let count = self.tiers.iter().filter(|t| t.tier == tier).count();
            if count != 1 {
                return Err(ProcessingError::ConfigError(format!(
                    "Urgency lexicon must define tier {tier} exactly once, found {count}"
                )));
            }
        }
        for tier in &self.tiers {
            let blank = tier.keywords.iter().any(|k| k.keyword.trim().is_empty())
                || tier.time_indicators.iter().any(|p| p.trim().is_empty());
            if blank {
                return Err(ProcessingError::ConfigError(format!(
                    "Blank keyword in urgency tier {}",
                    tier.tier
                )));
            }
        }
        Ok(())
    }
}

impl Default for UrgencyLexicon {
    fn default() -> Self {
        let table: [(PriorityTier, &[(&str, u32)], &[&str]); 3] = [
            (PriorityTier::High, HIGH_URGENCY, HIGH_TIME_INDICATORS),
            (PriorityTier::Medium, MEDIUM_URGENCY, MEDIUM_TIME_INDICATORS),
            (PriorityTier::Low, LOW_URGENCY, LOW_TIME_INDICATORS),
        ];
        UrgencyLexicon {
            tiers: table
                .into_iter()
                .map(|(tier, keywords, indicators)| UrgencyTier {
                    tier,
                    keywords: keywords
                        .iter()
                        .map(|(keyword, weight)| WeightedKeyword {
                            keyword: keyword.to_string(),
                            weight: *weight,
                        })
                        .collect(),
                    time_indicators: to_strings(indicators),
                })
                .collect(),
        }
    }
}

/// Both keyword tables. Built once at start-up and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Lexicons {
    pub departments: DepartmentLexicon,
    pub urgency: UrgencyLexicon,
}

impl Lexicons {
    pub fn from_json_str(json: &str) -> Result<Self, ProcessingError> {
        let raw: Lexicons = serde_json::from_str(json)?;
        Ok(Lexicons {
            departments: DepartmentLexicon::new(raw.departments.entries)?,
            urgency: UrgencyLexicon::new(raw.urgency.tiers)?,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProcessingError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ProcessingError::ConfigError(format!("Cannot read lexicon {}: {}", path.display(), e))
        })?;
        let lexicons = Self::from_json_str(&json)?;
        info!("Loaded lexicons from {}", path.display());
        Ok(lexicons)
    }

    pub fn json_schema() -> Result<String, ProcessingError> {
        let schema = schemars::schema_for!(Lexicons);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn fold_keywords(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}
