//! Error types shared across the digest pipeline

use thiserror::Error;

/// Digest pipeline errors
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Invalid record {}: {reason}", .id.as_deref().unwrap_or("<missing id>"))]
    InvalidRecord { id: Option<String>, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Headline generation failed: {0}")]
    Generation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DigestError {
    pub fn invalid_record(id: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.map(str::to_string),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for DigestError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
