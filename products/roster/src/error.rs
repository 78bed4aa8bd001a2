use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Employee not found with this email")]
    EmailNotFound(String),
    #[error("Employee not found")]
    IdNotFound(String),
    #[error("failed to read dataset {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RosterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmailNotFound(_) | Self::IdNotFound(_))
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
