use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::scoring::ScoringError;

/// Application-level error type. Extraction misses never show up here; they
/// are rendered as placeholder text instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
