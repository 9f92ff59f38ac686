//! Application errors for the CLI and server.

use dfs_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by `dfs` commands.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file did not contain valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error from the core engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// `fix --issue` named an id the scan did not produce.
    #[error("no issue with id {0:?} in the current scan")]
    IssueNotFound(String),

    /// Bad combination of command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// The HTTP server failed to bind or crashed.
    #[error("server error: {0}")]
    Server(String),
}

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
