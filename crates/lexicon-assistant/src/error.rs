//! Completion failure taxonomy

use thiserror::Error;

/// Why a completion did not produce a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Assistant disabled, no usable key, or empty prompt. No request was sent.
    #[error("Assistant is not available")]
    NotReady,

    /// The service answered but returned no usable content
    #[error("The assistant returned an empty response, please try again")]
    EmptyResponse,

    /// The service rejected the request
    #[error("Completion API error {status}: {message}")]
    RemoteApi {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The service could not be reached
    #[error("Network error: {message}")]
    Network { message: String },
}

impl CompletionError {
    /// Short, stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::EmptyResponse => "empty_response",
            Self::RemoteApi { .. } => "remote_api",
            Self::Network { .. } => "network",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Authentication or permission failure (bad or revoked key)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// The requested model does not exist or is not available to this key
    pub fn is_invalid_model(&self) -> bool {
        match self {
            Self::RemoteApi { status, code, .. } => {
                *status == 404 || code.as_deref() == Some("model_not_found")
            }
            _ => false,
        }
    }

    /// Transient condition that may succeed if retried
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::EmptyResponse => true,
            Self::RemoteApi { status, .. } => *status == 429 || *status >= 500,
            Self::NotReady => false,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16, code: Option<&str>) -> CompletionError {
        CompletionError::RemoteApi {
            status,
            code: code.map(str::to_string),
            message: "rejected".to_string(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(remote(401, Some("invalid_api_key")).is_auth_failure());
        assert!(remote(403, None).is_auth_failure());
        assert!(remote(429, Some("rate_limit_exceeded")).is_rate_limited());
        assert!(remote(404, None).is_invalid_model());
        assert!(remote(400, Some("model_not_found")).is_invalid_model());
        assert!(!remote(400, Some("invalid_request_error")).is_invalid_model());
    }

    #[test]
    fn test_retryable() {
        assert!(remote(429, None).is_retryable());
        assert!(remote(503, None).is_retryable());
        assert!(!remote(401, None).is_retryable());
        assert!(CompletionError::Network {
            message: "connection refused".to_string()
        }
        .is_retryable());
        assert!(!CompletionError::NotReady.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            remote(401, None).to_string(),
            "Completion API error 401: rejected"
        );
        assert_eq!(CompletionError::NotReady.kind(), "not_ready");
    }
}
