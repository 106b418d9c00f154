//! Error types for ClickForge.

use thiserror::Error;

/// A shared error type for the entire ClickForge workspace.
///
/// Variants are structured so callers can branch on the kind of failure while
/// `Display` stays human readable. Conversions from the common library error
/// types are provided via `From`.
#[derive(Error, Debug, Clone)]
pub enum ClickforgeError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Security/authentication error (missing or unusable credentials)
    #[error("Security error: {0}")]
    Security(String),

    /// The remote generative service failed or returned an unusable response.
    #[error("Service error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// Caller supplied input that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClickforgeError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    /// Creates a Service error without an HTTP status.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Service error carrying the HTTP status code.
    pub fn service_status(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error came from the remote service
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ClickforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ClickforgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ClickforgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ClickforgeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for ClickforgeError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Serialization {
            format: "base64".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClickforgeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Service {
            status: err.status().map(|s| s.as_u16()),
            message: format!("request failed: {err}"),
        }
    }
}

impl From<tokio::task::JoinError> for ClickforgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("background task failed: {err}"))
    }
}

/// Conversion from anyhow::Error (used at binary edges)
impl From<anyhow::Error> for ClickforgeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ClickforgeError>`.
pub type Result<T> = std::result::Result<T, ClickforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_display_includes_status() {
        let err = ClickforgeError::service_status(429, "RESOURCE_EXHAUSTED: quota");
        assert_eq!(
            err.to_string(),
            "Service error (429): RESOURCE_EXHAUSTED: quota"
        );
        assert!(err.is_service());
    }

    #[test]
    fn test_service_display_without_status() {
        let err = ClickforgeError::service("no image in response");
        assert_eq!(err.to_string(), "Service error: no image in response");
    }

    #[test]
    fn test_from_json_error() {
        let err: ClickforgeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_serialization());
    }
}
