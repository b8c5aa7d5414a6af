//! Domain error types
//!
//! This module defines the error hierarchy for nivex. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main nivex error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum NivexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (invalid identifiers, malformed values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Earth Engine-related errors
    #[error("Earth Engine error: {0}")]
    EarthEngine(#[from] EarthEngineError),

    /// Google Drive-related errors
    #[error("Google Drive error: {0}")]
    Drive(#[from] DriveError),

    /// Export orchestration errors
    #[error("Export error: {0}")]
    Export(String),

    /// Report rendering errors
    #[error("Report error: {0}")]
    Report(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised by a remote job handle
///
/// A job handle exposes exactly two fallible operations: submission and
/// status querying. Both faults are recovered locally by the owning export
/// task and never abort the batch.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job could not be submitted to the provider
    #[error("Failed to submit export job: {0}")]
    Submission(String),

    /// The provider could not report the job's status
    #[error("Failed to query job status: {0}")]
    StatusQuery(String),
}

/// Earth Engine-specific errors
///
/// Errors that occur when interacting with the Earth Engine REST API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum EarthEngineError {
    /// Failed to connect to the Earth Engine API
    #[error("Failed to connect to Earth Engine: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Asset folder or collection not found
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Invalid response from the API
    #[error("Invalid response from Earth Engine: {0}")]
    InvalidResponse(String),

    /// Export submission rejected
    #[error("Export submission failed: {0}")]
    ExportFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

/// Google Drive-specific errors
#[derive(Debug, Error)]
pub enum DriveError {
    /// Failed to connect to the Drive API
    #[error("Failed to connect to Google Drive: {0}")]
    ConnectionFailed(String),

    /// Folder not found or not listable
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// Invalid response from the API
    #[error("Invalid response from Google Drive: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for NivexError {
    fn from(err: std::io::Error) -> Self {
        NivexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for NivexError {
    fn from(err: serde_json::Error) -> Self {
        NivexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for NivexError {
    fn from(err: toml::de::Error) -> Self {
        NivexError::Configuration(format!("TOML parse error: {err}"))
    }
}
