// Error types for cardpin.
// Handles process-level failures: configuration, fixtures, logging, and terminal I/O.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config {}:{line}:{column}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Sandbox fixture not found: {}", path.display())]
    FixtureNotFound { path: PathBuf },

    #[error("Invalid sandbox fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not determine a cache directory for logs")]
    NoCacheDir,

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
