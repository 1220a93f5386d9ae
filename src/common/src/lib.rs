use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod api;
pub mod aurora;

pub use api::{LeaderResolver, SchedulerApi};

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Scheduler responded with {code}: {message}")]
    Scheduler { code: ResponseCode, message: String },
    #[error("Zookeeper error: {0}")]
    Zookeeper(String),
    #[error("No leader found under {path}")]
    NoLeader { path: String },
    #[error("Ambiguous endpoints under {path}, expected at most one additional endpoint")]
    AmbiguousEndpoints { path: String },
    #[error("invalid master file content")]
    InvalidMasterFileContent,
    #[error("{0}")]
    Validation(String),
    #[error("No scheduler configured: pass --scheduler-addr or --zookeeper")]
    NoScheduler,
}

impl Error {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome code carried by every scheduler API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    InvalidRequest,
    Ok,
    Error,
    Warning,
    AuthFailed,
    LockError,
    ErrorTransient,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::AuthFailed => "AUTH_FAILED",
            Self::LockError => "LOCK_ERROR",
            Self::ErrorTransient => "ERROR_TRANSIENT",
        };
        f.write_str(code)
    }
}
