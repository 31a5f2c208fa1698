//! Error types for snapsort

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snapsort operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for snapsort
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No image files found in the selected source folders")]
    NoFilesFound,

    #[error("Failed to place {path} at {destination}: {message}")]
    Placement {
        path: PathBuf,
        destination: String,
        message: String,
    },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
