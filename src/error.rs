//! # Error Types
//!
//! This module defines error types used throughout the hanzi-sheet library.
//!
//! No error here is fatal to a whole worksheet: stroke errors put a single
//! row into its errored state, annotation errors degrade to placeholder text.

use thiserror::Error;

/// Main error type for hanzi-sheet operations
#[derive(Debug, Error)]
pub enum SheetError {
    /// Batched annotation lookup failed
    #[error("Annotation fetch failed: {0}")]
    AnnotationFetch(String),

    /// The stroke-data provider has no entry for this character
    #[error("Stroke data not found for '{0}'")]
    StrokeNotFound(char),

    /// Stroke data was returned but could not be understood
    #[error("Malformed stroke data for '{character}': {reason}")]
    StrokeMalformed { character: char, reason: String },

    /// Stroke lookup did not resolve in time
    #[error("Stroke data request for '{0}' timed out")]
    StrokeTimeout(char),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration value that could not be repaired
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP server error (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SheetError {
    fn from(e: reqwest::Error) -> Self {
        SheetError::Http(e.to_string())
    }
}
