use std::{env, path::PathBuf, str::FromStr};

use log::info;

use crate::{error::ProcessingError, lexicon::Lexicons, validation::LengthBounds};

pub const LEXICON_PATH_VAR: &str = "COMPLAINT_LEXICON_PATH";
pub const MIN_LENGTH_VAR: &str = "COMPLAINT_MIN_LENGTH";
pub const MAX_LENGTH_VAR: &str = "COMPLAINT_MAX_LENGTH";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriageConfig {
    pub lexicon_path: Option<PathBuf>,
    pub bounds: LengthBounds,
}

impl TriageConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ProcessingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProcessingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LengthBounds::default();
        let bounds = LengthBounds {
            min: parse_var(&lookup, MIN_LENGTH_VAR)?.unwrap_or(defaults.min),
            max: parse_var(&lookup, MAX_LENGTH_VAR)?.unwrap_or(defaults.max),
        };
        if bounds.min > bounds.max {
            return Err(ProcessingError::ConfigError(format!(
                "{MIN_LENGTH_VAR} ({}) exceeds {MAX_LENGTH_VAR} ({})",
                bounds.min, bounds.max
            )));
        }

        let lexicon_path = lookup(LEXICON_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(TriageConfig {
            lexicon_path,
            bounds,
        })
    }

    pub fn with_lexicon_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.lexicon_path = path;
        }
        self
    }

    pub fn load_lexicons(&self) -> Result<Lexicons, ProcessingError> {
        match &self.lexicon_path {
            Some(path) => Lexicons::from_path(path),
            None => {
                info!("Using built-in lexicons");
                Ok(Lexicons::default())
            }
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ProcessingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ProcessingError::ConfigError(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = TriageConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TriageConfig::default());
        assert_eq!(config.load_lexicons().unwrap(), Lexicons::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = TriageConfig::from_lookup(lookup(&[
            (MIN_LENGTH_VAR, "5"),
            (MAX_LENGTH_VAR, " 200 "),
            (LEXICON_PATH_VAR, "/etc/triage/lexicon.json"),
        ]))
        .unwrap();
        assert_eq!(config.bounds, LengthBounds { min: 5, max: 200 });
        assert_eq!(
            config.lexicon_path,
            Some(PathBuf::from("/etc/triage/lexicon.json"))
        );
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        let err = TriageConfig::from_lookup(lookup(&[(MAX_LENGTH_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ProcessingError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result =
            TriageConfig::from_lookup(lookup(&[(MIN_LENGTH_VAR, "100"), (MAX_LENGTH_VAR, "10")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_lexicon_file_is_config_error() {
        let config = TriageConfig::default()
            .with_lexicon_path(Some(PathBuf::from("/nonexistent/lexicon.json")));
        assert!(matches!(
            config.load_lexicons(),
            Err(ProcessingError::ConfigError(_))
        ));
    }
}
