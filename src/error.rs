//! Error types for swifty

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid pattern for rule {rule}: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("No file name")]
    NoFileName,

    #[error("A run is already in progress")]
    RunInProgress,

    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No interpreter for {}", .0.display())]
    NoInterpreter(PathBuf),

    #[error("{0}")]
    Message(String),
}
