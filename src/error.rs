// src/error.rs
//
// Error types shared by the fingerprinting core and its collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the fingerprinting library
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// A tunable is outside its accepted range. Raised before any work is done.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("FFT error: {0}")]
    Transform(String),

    #[error("Decoder error: {0}")]
    Decode(String),

    #[error("Config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FingerprintError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FingerprintError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FingerprintError>;
