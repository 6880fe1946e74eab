//! Error types for tilecover
//!
//! The decomposition and planning algorithms are total and never fail;
//! errors only come from the persistence and command-line surfaces.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
