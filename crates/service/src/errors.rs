use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cannot read {path}: {source}")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {reason}")]
    StoreParse { path: PathBuf, reason: String },
    #[error("seed fetch failed: {0}")]
    Fetch(String),
    #[error("storage io error: {0}")]
    Io(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("no user id left after {0}")]
    IdExhausted(i64),
}

impl ServiceError {
    /// Errors that `load()` recovers from by seeding again.
    pub fn is_recoverable_read(&self) -> bool {
        matches!(self, Self::StoreRead { .. } | Self::StoreParse { .. })
    }
}

impl From<common::CoreError> for ServiceError {
    fn from(e: common::CoreError) -> Self {
        Self::Fetch(e.to_string())
    }
}
