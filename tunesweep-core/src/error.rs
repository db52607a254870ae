use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Transport failed: {0}")]
    Transport(String),
    #[error("Parsing failed on {endpoint} response (status {status}): {reason}")]
    Parse {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },
    #[error("Log write failed for '{}': {reason}", path.display())]
    LogWrite { path: PathBuf, reason: String },
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl SweepError {
    pub fn config(reason: impl Into<String>) -> Self {
        SweepError::Config(reason.into())
    }

    /// Errors that end the whole run regardless of the parse policy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SweepError::Config(_) | SweepError::Transport(_) | SweepError::Serde(_)
        )
    }
}
