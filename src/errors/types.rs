//! # Error Types
//!
//! Error types for the authgate library using `thiserror`.

/// Custom result type for authgate operations
pub type Result<T> = std::result::Result<T, AuthGateError>;

/// Main error type for the authgate library
#[derive(thiserror::Error, Debug)]
pub enum AuthGateError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream forwarding errors
    #[error("Upstream error: {context}")]
    Upstream {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthGateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create an upstream error with source
    pub fn upstream<S: Into<String>>(context: S, source: reqwest::Error) -> Self {
        Self::Upstream {
            context: context.into(),
            source,
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AuthGateError::config("missing auth URL");
        assert_eq!(err.to_string(), "Configuration error: missing auth URL");
    }

    #[test]
    fn test_internal_error_display() {
        let err = AuthGateError::internal("boom");
        assert_eq!(err.to_string(), "Internal error: boom");
    }
}
