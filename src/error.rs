//! Error types for the back-office client library.

/// All errors that can occur when talking to the back-office services.
#[derive(Debug, thiserror::Error)]
pub enum BackofficeError {
    /// Transport-level failure (connection, timeout, TLS, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured base URL could not be used to build a request URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A record failed client-side validation before being sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The in-memory state could not be accessed (poisoned lock).
    #[error("state error: {0}")]
    State(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = BackofficeError::from(serde_err);
        assert!(matches!(err, BackofficeError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn api_error_display() {
        let err = BackofficeError::Api {
            status: 404,
            message: "not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn validation_error_display() {
        let err = BackofficeError::Validation("trade name is required".to_owned());
        assert_eq!(err.to_string(), "validation error: trade name is required");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BackofficeError>();
    }
}
