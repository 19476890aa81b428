use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_COLOR_DATE: fn() -> String = || String::from("#000080");
const DEFAULT_COLOR_PATH: fn() -> String = || String::from("#000000");
const DEFAULT_COLOR_HIGHLIGHT: fn() -> String = || String::from("#FFDD51");
const DEFAULT_COLOR_SHORTCUT_NAME: fn() -> String = || String::from("Green");

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Colors {
    #[serde(default = "DEFAULT_COLOR_DATE")]
    pub date: String,

    #[serde(default = "DEFAULT_COLOR_PATH")]
    pub path: String,

    #[serde(default = "DEFAULT_COLOR_HIGHLIGHT")]
    pub highlight: String,

    #[serde(default = "DEFAULT_COLOR_SHORTCUT_NAME")]
    pub shortcut_name: String,
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            date: DEFAULT_COLOR_DATE(),
            path: DEFAULT_COLOR_PATH(),
            highlight: DEFAULT_COLOR_HIGHLIGHT(),
            shortcut_name: DEFAULT_COLOR_SHORTCUT_NAME(),
        }
    }
}

const DEFAULT_MAX_AGE_DAYS: fn() -> u64 = || 90;
const DEFAULT_MAX_ENTRIES: fn() -> usize = || 1000;
const DEFAULT_MIN_KEEP_VISITS: fn() -> u32 = || 3;
const DEFAULT_PRUNE_FREQUENCY: fn() -> u64 = || 20;

/// Prune thresholds; see `Store::prune`. `frequency` is the denominator of
/// the opportunistic-prune fraction: roughly one in `frequency` visit
/// recordings also prunes.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct PruneConfig {
    #[serde(default = "DEFAULT_MAX_AGE_DAYS")]
    pub max_age_days: u64,

    #[serde(default = "DEFAULT_MAX_ENTRIES")]
    pub max_entries: usize,

    #[serde(default = "DEFAULT_MIN_KEEP_VISITS")]
    pub min_keep_visits: u32,

    #[serde(default = "DEFAULT_PRUNE_FREQUENCY")]
    pub frequency: u64,
}

impl Default for PruneConfig {
    fn default() -> Self {
        PruneConfig {
            max_age_days: DEFAULT_MAX_AGE_DAYS(),
            max_entries: DEFAULT_MAX_ENTRIES(),
            min_keep_visits: DEFAULT_MIN_KEEP_VISITS(),
            frequency: DEFAULT_PRUNE_FREQUENCY(),
        }
    }
}

const DEFAULT_JUMP_STEP: fn() -> usize = || 5;

/// Loaded once at startup and immutable for the process lifetime.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub colors: Colors,

    /// Cursor step for shift+up / shift+down.
    #[serde(default = "DEFAULT_JUMP_STEP")]
    pub jump_step: usize,

    #[serde(default)]
    pub prune: PruneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            colors: Colors::default(),
            jump_step: DEFAULT_JUMP_STEP(),
            prune: PruneConfig::default(),
        }
    }
}

impl Config {
    /// Read the config file if present; a missing file means defaults, a
    /// malformed file is an error the user should see.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path).map_err(Error::ConfigRead)?;
        let config = toml::from_str(&text).map_err(Error::ConfigParse)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.jump_step, 5);
        assert_eq!(config.prune.max_entries, 1000);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: Config = toml::from_str(
            r##"
            jump_step = 10

            [colors]
            highlight = "#AA0000"

            [prune]
            max_entries = 200
            "##,
        )
        .unwrap();
        assert_eq!(config.jump_step, 10);
        assert_eq!(config.colors.highlight, "#AA0000");
        assert_eq!(config.colors.date, "#000080");
        assert_eq!(config.prune.max_entries, 200);
        assert_eq!(config.prune.max_age_days, 90);
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
