//! Error types for the library boundary
//!
//! Analyzer bodies use `anyhow` internally; anything a caller of the
//! library can observe is expressed as a `MeiliscanError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeiliscanError {
    #[error("invalid finding id '{0}': expected MEILI-<letter><3 digits>")]
    InvalidFinding(String),

    #[error("failed to parse snapshot bundle: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("failed to parse report: {0}")]
    Report(#[source] serde_json::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MeiliscanError>;
