// src/error.rs

//! Error types for the conversion pipeline
//!
//! Every stage returns `Result`; the driver aborts the remaining stages on
//! the first error and the staging directory guard removes the temp tree
//! regardless of which stage failed.

use thiserror::Error;

/// Errors surfaced by the conversion pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Input path missing or not a `.deb` file. No resources have been
    /// allocated when this is raised.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Package exists but fails the structural check; carries the tool's
    /// diagnostic output
    #[error("invalid or corrupted .deb package: {0}")]
    InvalidPackage(String),

    /// External extraction tool exited nonzero; the staging directory has
    /// already been removed
    #[error("failed to extract .deb package: {0}")]
    ExtractionFailed(String),

    /// Filesystem failure during restructuring, synthesis or packaging
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Record serialization failure
    #[error("failed to encode {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap an I/O error with a contextual message
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
