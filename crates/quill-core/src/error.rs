//! Error types for the Quill application.

use thiserror::Error;

/// A shared error type for the entire Quill application.
///
/// The first four variants mirror the failure taxonomy of a generation
/// session; the remaining ones cover the plumbing around it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuillError {
    /// Bad input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The persistence store rejected or could not receive a create call
    #[error("Create failed: {0}")]
    Create(String),

    /// The generation channel failed to open or errored mid-stream
    #[error("Generation failed: {0}")]
    Generation(String),

    /// An update/list/remove call failed after the session already moved on
    #[error("Persistence sync failed: {0}")]
    PersistenceSync(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An event was applied in a state that does not accept it
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition { state: String, event: String },

    /// Non-success HTTP response or transport failure
    #[error("HTTP error{}: {message}", status_suffix(.status))]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl QuillError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Create error
    pub fn create(message: impl Into<String>) -> Self {
        Self::Create(message.into())
    }

    /// Creates a Generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates a PersistenceSync error
    pub fn persistence_sync(message: impl Into<String>) -> Self {
        Self::PersistenceSync(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates an Http error
    pub fn http(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was raised by the state machine
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Human-readable reason without the variant prefix.
    ///
    /// Used as `error_detail` on failed sessions, so the persisted error
    /// column reads "connection refused" rather than "Create failed: ...".
    pub fn reason(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Create(msg)
            | Self::Generation(msg)
            | Self::PersistenceSync(msg)
            | Self::Config(msg) => msg.clone(),
            Self::Http { message, .. }
            | Self::Serialization { message, .. }
            | Self::Io { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for QuillError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for QuillError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" {code}")).unwrap_or_default()
}

/// A type alias for `Result<T, QuillError>`.
pub type Result<T> = std::result::Result<T, QuillError>;
