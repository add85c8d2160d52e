//! Error types for the ackbridge CLI

use std::path::PathBuf;

use thiserror::Error;

use ackbridge_common::telemetry::TelemetryError;

/// Main error type for the CLI
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Reading input or writing output failed
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The input document has the wrong shape
    #[error("invalid input document: {0}")]
    Input(String),

    /// Translation failed
    #[error(transparent)]
    Synth(#[from] ackbridge_common::Error),

    /// Logging could not be set up
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl Error {
    /// Create an input error with the given message
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
