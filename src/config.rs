//! Threshold and exclusion configuration.
//!
//! Sources, lowest priority first: built-in defaults, a TOML file, then
//! `VIBECTOR_*` environment variables. Command-line overrides are applied by
//! the caller on top of the loaded value.
//!
//! ```toml
//! exclude_files = ["*.lock", "package-lock.json"]
//!
//! [thresholds]
//! suspicious_additions = 500
//! max_additions_per_min = 100.0
//! ```

use crate::detector::Thresholds;
use crate::error::{Result, VibeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = ".vibector.toml";
pub const ENV_PREFIX: &str = "VIBECTOR_";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exclude_files: Vec<String>,
    pub thresholds: Thresholds,
}

impl Config {
    /// Loads defaults, the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VibeError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides fields from `VIBECTOR_*` variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let t = &mut self.thresholds;
        override_from(&lookup, "SUSPICIOUS_ADDITIONS", &mut t.suspicious_additions)?;
        override_from(&lookup, "SUSPICIOUS_DELETIONS", &mut t.suspicious_deletions)?;
        override_from(&lookup, "MAX_ADDITIONS_PER_MIN", &mut t.max_additions_per_min)?;
        override_from(&lookup, "MAX_DELETIONS_PER_MIN", &mut t.max_deletions_per_min)?;
        override_from(&lookup, "MIN_TIME_DELTA_SECONDS", &mut t.min_time_delta_seconds)?;

        if let Some(raw) = lookup(&format!("{ENV_PREFIX}EXCLUDE_FILES")) {
            self.exclude_files = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }
}

fn override_from<T, F>(lookup: &F, name: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}{name}");
    if let Some(raw) = lookup(&key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e| VibeError::Config(format!("Invalid value for {key} ({raw:?}): {e}")))?;
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vibector configuration
# Flags commits whose size, speed or spacing looks tool-assisted.

# File patterns left out of the filtered diff counts, matched against the
# full path and the file name (e.g. ["*.log", "*.lock", "package-lock.json"])
exclude_files = []

[thresholds]
# Commit size: flag commits with more added / deleted lines than this (0 disables)
suspicious_additions = 500
suspicious_deletions = 1000

# Velocity in lines per minute since the previous commit (0 disables).
# Typical human rates: 20-50 additions/min, 50-200 deletions/min.
max_additions_per_min = 100.0
max_deletions_per_min = 500.0

# Flag commits made less than this many seconds after the previous one (0 disables)
min_time_delta_seconds = 60
"#;

pub fn sample_config() -> &'static str {
    SAMPLE_CONFIG
}

/// Writes the sample config to `path`, refusing to overwrite.
pub fn write_sample_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(VibeError::Config(format!(
            "Config file already exists: {}",
            path.display()
        )));
    }
    std::fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_a_valid_policy() {
        let config = Config::default();
        assert!(config.exclude_files.is_empty());
        assert!(config.thresholds.validate().is_ok());
    }

    #[test]
    fn sample_config_round_trips_to_defaults() {
        let config = Config::from_toml(sample_config()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            exclude_files = ["*.lock"]

            [thresholds]
            suspicious_additions = 42
            max_deletions_per_min = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.exclude_files, vec!["*.lock".to_string()]);
        assert_eq!(config.thresholds.suspicious_additions, 42);
        assert_eq!(config.thresholds.max_deletions_per_min, 0.0);
        assert_eq!(config.thresholds.suspicious_deletions, 1000);
        assert_eq!(config.thresholds.min_time_delta_seconds, 60);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml("[thresholds\nsuspicious_additions = ").is_err());
        assert!(Config::from_toml("[thresholds]\nsuspicious_additions = \"many\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("VIBECTOR_SUSPICIOUS_ADDITIONS", "10"),
                ("VIBECTOR_MAX_ADDITIONS_PER_MIN", " 2.5 "),
                ("VIBECTOR_EXCLUDE_FILES", "*.log, vendor/*.go,,"),
            ]))
            .unwrap();

        assert_eq!(config.thresholds.suspicious_additions, 10);
        assert_eq!(config.thresholds.max_additions_per_min, 2.5);
        assert_eq!(config.thresholds.suspicious_deletions, 1000);
        assert_eq!(
            config.exclude_files,
            vec!["*.log".to_string(), "vendor/*.go".to_string()]
        );
    }

    #[test]
    fn unparsable_environment_value_names_the_key() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("VIBECTOR_MIN_TIME_DELTA_SECONDS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("VIBECTOR_MIN_TIME_DELTA_SECONDS"));
    }

    #[test]
    fn sample_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        write_sample_config(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), sample_config());
        assert!(write_sample_config(&path).is_err());
    }
}
