//! Client error types.

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the m3ter API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The credential exchange failed or returned no token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A response body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures and 5xx responses are retryable; client errors,
    /// authentication and decode failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Auth(_) | Self::Decode(_) | Self::Configuration(_) => false,
        }
    }

    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ClientError::Transport("connection reset".into()).is_retryable());
        assert!(ClientError::Api {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 404,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Auth("bad secret".into()).is_retryable());
    }

    #[test]
    fn status_only_for_api_errors() {
        let err = ClientError::Api {
            status: 409,
            body: "{}".into(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(ClientError::Transport("x".into()).status(), None);
    }
}
