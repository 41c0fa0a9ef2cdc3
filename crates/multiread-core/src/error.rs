//! Multiread error types

use thiserror::Error;

/// The main error type for multiread operations
#[derive(Error, Debug)]
pub enum Error {
    /// An underlying source failed to read (end-of-stream is not an error)
    #[error("Source read error: {0}")]
    SourceRead(#[from] std::io::Error),

    /// The sniffed prefix classified as a type outside the accepted set
    #[error("Unexpected content type: {detected} (expected one of: {})", .expected.join(", "))]
    ContentTypeMismatch {
        /// Label produced by the detector
        detected: String,
        /// Accepted media types at the time of the check
        expected: Vec<String>,
    },

    /// A JSON record could not be decoded
    #[error("Record decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Sniff configuration out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for multiread operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a content type mismatch error
    pub fn mismatch(detected: impl Into<String>, expected: &[String]) -> Self {
        Error::ContentTypeMismatch {
            detected: detected.into(),
            expected: expected.to_vec(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// The detected label, if this is a content type mismatch
    pub fn detected_type(&self) -> Option<&str> {
        match self {
            Error::ContentTypeMismatch { detected, .. } => Some(detected),
            _ => None,
        }
    }
}
