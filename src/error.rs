use thiserror::Error;

/// Errors that can occur while resolving a device identity.
///
/// The `Display` text of each variant is what the presentation layer shows
/// after `Error:`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IdentityError {
    // ============================================================================
    // I/O and System Errors
    // ============================================================================
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serde JSON error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("Failed to fetch identity")]
    FetchFailed { status: u16 },

    #[error("{message}")]
    CreationFailed { status: u16, message: String },

    // ============================================================================
    // Protocol Errors
    // ============================================================================
    #[error("Invalid identity record: {message}")]
    InvalidRecord { message: String },

    #[error("Invalid device id: {message}")]
    InvalidDeviceId { message: String },

    // ============================================================================
    // Collaborator Errors
    // ============================================================================
    #[error("Fingerprinting failed: {message}")]
    Fingerprint { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    // ============================================================================
    // Lifecycle Errors
    // ============================================================================
    #[error("Invalid state transition: {message}")]
    InvalidState { message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl IdentityError {
    /// Create an invalid record error with a message
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: msg.into(),
        }
    }

    /// Create an invalid device id error with a message
    pub fn invalid_device_id(msg: impl Into<String>) -> Self {
        Self::InvalidDeviceId {
            message: msg.into(),
        }
    }

    /// Create a fingerprinting error with a message
    pub fn fingerprint(msg: impl Into<String>) -> Self {
        Self::Fingerprint {
            message: msg.into(),
        }
    }

    /// Create a storage error with a message
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    /// Create an invalid state error with a message
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState {
            message: msg.into(),
        }
    }

    /// Create a creation failure carrying the message to surface
    pub fn creation_failed(status: u16, message: impl Into<String>) -> Self {
        Self::CreationFailed {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is a cancellation rather than a real failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status }
            | Self::FetchFailed { status }
            | Self::CreationFailed { status, .. } => Some(*status),
            Self::Reqwest { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
