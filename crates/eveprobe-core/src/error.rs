//! Error types for eveprobe.
//!
//! This module defines all error types that can occur during a probe run.

/// The main error type for probe operations.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Configuration-file errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid connection or policy parameter
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Login was rejected or could not be performed
    #[error("login failed: {0}")]
    Auth(#[source] Box<ProbeError>),

    /// HTTP transport errors (wraps reqwest errors)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-200 status
    #[error("remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// The requested lab is unknown to the server
    #[error("lab '{0}' does not exist")]
    LabNotFound(String),

    /// A response body could not be decoded
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        source: serde_json::Error,
    },

    /// Folder traversal failed at the named folder
    #[error("failed to list folder '{folder}': {source}")]
    Folder {
        folder: String,
        source: Box<ProbeError>,
    },

    /// The subsystem status could not be read
    #[error("failed to read subsystem status: {0}")]
    StatusFetch(#[source] Box<ProbeError>),
}

impl ProbeError {
    /// Create a config error with a message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid config error
    pub fn invalid_config<S: Into<String>>(field: S, message: S) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a failure of the login call
    pub fn auth(source: ProbeError) -> Self {
        Self::Auth(Box::new(source))
    }

    /// Create a remote API error from a status code and extracted message
    pub fn remote<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error naming the entity that failed to parse
    pub fn decode<S: Into<String>>(what: S, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// Wrap a traversal failure with the folder it happened in
    pub fn in_folder<S: Into<String>>(folder: S, source: ProbeError) -> Self {
        Self::Folder {
            folder: folder.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure of the subsystem status call
    pub fn status_fetch(source: ProbeError) -> Self {
        Self::StatusFetch(Box::new(source))
    }

    /// Check if this error means the requested lab is absent on the server
    pub fn is_lab_not_found(&self) -> bool {
        matches!(self, Self::LabNotFound(_))
    }
}

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
