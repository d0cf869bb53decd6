//! Error types for the bevy_bandstage plugin
//!
//! This module provides error handling for SFX sample loading, manifest
//! parsing, and sample-engine management.

use thiserror::Error;

use crate::engine::EngineErrorCode;

/// The main error type for bevy_bandstage operations
///
/// This enum represents all possible errors that can occur during SFX sample
/// loading, manifest handling, and sample-engine management in the
/// bevy_bandstage plugin.
#[derive(Error, Debug)]
pub enum BandStageError {
    /// The sample engine refused to load a sample file
    #[error("Failed to load sample '{path}': {code}")]
    SampleLoad {
        path: String,
        code: EngineErrorCode,
    },

    /// Error reading an SFX manifest from disk
    #[error("Failed to read SFX manifest '{path}': {reason}")]
    ManifestRead { path: String, reason: String },

    /// Invalid or malformed SFX manifest
    #[error("Invalid SFX manifest: {0}")]
    Manifest(String),

    /// Error creating or driving the sample engine
    #[error("Sample engine error: {0}")]
    Engine(String),

    /// Generic or miscellaneous error
    #[error("{0}")]
    Other(String),
}

impl BandStageError {
    /// Creates a sample load error with path and engine code
    pub fn sample_load(path: impl Into<String>, code: EngineErrorCode) -> Self {
        BandStageError::SampleLoad {
            path: path.into(),
            code,
        }
    }

    /// Creates a manifest read error with path and reason
    pub fn manifest_read(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BandStageError::ManifestRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed manifest error
    pub fn manifest(reason: impl Into<String>) -> Self {
        BandStageError::Manifest(reason.into())
    }

    /// Creates a sample engine error
    pub fn engine(reason: impl Into<String>) -> Self {
        BandStageError::Engine(reason.into())
    }
}

/// Type alias for Result using BandStageError
pub type Result<T> = std::result::Result<T, BandStageError>;

impl From<String> for BandStageError {
    fn from(s: String) -> Self {
        BandStageError::Other(s)
    }
}

impl From<&str> for BandStageError {
    fn from(s: &str) -> Self {
        BandStageError::Other(s.to_string())
    }
}
