use thiserror::Error;

use crate::time::Timestamp;

/// Whatever a fact source reports when it cannot answer a query.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TimesliceError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid range: {from} is not before {until}")]
    InvalidRange { from: Timestamp, until: Timestamp },
    #[error("Source query failed for '{source_name}': {cause}")]
    SourceQuery {
        source_name: String,
        #[source]
        cause: SourceError,
    },
    #[error("Malformed fact from '{source_name}': {message}")]
    MalformedFact { source_name: String, message: String },
    #[error("Duplicate source: {0}")]
    DuplicateSource(String),
    #[error("Time parse error: {0}")]
    TimeParse(String),
}

pub type Result<T> = std::result::Result<T, TimesliceError>;

// Helper conversions
impl From<config::ConfigError> for TimesliceError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
