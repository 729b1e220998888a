use thiserror::Error;

use crate::host::HostError;

/// Unified error type for git-rollout operations
#[derive(Error, Debug)]
pub enum RolloutError {
    #[error("Host operation failed: {0}")]
    Host(#[from] HostError),

    #[error("Issue tracker operation failed: {0}")]
    Tracker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Schedule parsing error: {0}")]
    Schedule(String),

    #[error("Cannot resolve reference for branch '{branch}': {source}")]
    RefLookup {
        branch: String,
        #[source]
        source: HostError,
    },

    #[error("latest release found (ID={id}, URL={url:?}) is not a draft")]
    NotADraft { id: i64, url: String },

    #[error("publishing latest found release (ID={id}, URL={url:?}): {source}")]
    Publish {
        id: i64,
        url: String,
        #[source]
        source: HostError,
    },

    #[error("No release found for this repository")]
    NoRelease,

    #[error("deployment stopped since first release time has passed. Please run again")]
    ScheduleElapsed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-rollout
pub type Result<T> = std::result::Result<T, RolloutError>;

impl RolloutError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RolloutError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        RolloutError::Version(msg.into())
    }

    /// Create a schedule error with context
    pub fn schedule(msg: impl Into<String>) -> Self {
        RolloutError::Schedule(msg.into())
    }

    /// Create an issue tracker error with context
    pub fn tracker(msg: impl Into<String>) -> Self {
        RolloutError::Tracker(msg.into())
    }
}
