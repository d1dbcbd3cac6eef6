//! Error types for the sync subsystem.

use std::path::PathBuf;

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("skill `{skill}` conflicts with existing content at `{}`", path.display())]
    Conflict { skill: String, path: PathBuf },

    #[error("`{command}` failed in `{}`: {detail}", dir.display())]
    ExternalTool {
        command: String,
        dir: PathBuf,
        detail: String,
    },

    #[error("`{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("malformed ledger at `{}`: {reason}", path.display())]
    MalformedLedger { path: PathBuf, reason: String },

    #[error("invalid install source `{source_arg}`: {reason}")]
    InvalidSource { source_arg: String, reason: String },

    #[error("invalid skill name `{0}`")]
    InvalidName(String),

    #[error("archive error in `{}`: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error at `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("platform `{0}` is not available")]
    UnknownPlatform(String),

    #[error("failed to read decision: {0}")]
    Interaction(#[source] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SyncError>;
