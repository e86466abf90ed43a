// config lets you read a separate config file, with environment overrides on top
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::boundary::MergeStrategy;
use crate::error::Result;

/// Base name of the settings file, any format the `config` crate knows (`timeslice.toml`, ...).
pub const SETTINGS_FILE: &str = "timeslice";
/// Environment variables with this prefix override the file, e.g. `TIMESLICE_MERGE_STRATEGY=sort`.
pub const ENV_PREFIX: &str = "TIMESLICE";

#[derive(Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(default)]
pub struct Settings {
    pub merge_strategy: MergeStrategy,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            merge_strategy: MergeStrategy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_FILE)
    }
    /// Reads `path` if it exists, then the environment. Missing values keep their defaults.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
