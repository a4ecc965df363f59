//! Transport error types.
//!
//! Covers everything that can go wrong between the client and the assistant
//! backend: connecting, non-2xx answers, timeouts, and broken stream bodies.

use std::time::Duration;

use thiserror::Error;

use crate::traits::HttpError;

/// Failure talking to the assistant backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not reach the server.
    #[error("connection to '{url}' failed: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The operation exceeded its time budget.
    #[error("{operation} timed out after {duration_ms} ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The server answered 2xx with a body we cannot use.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The stream body broke while it was being read.
    #[error("stream interrupted: {message}")]
    StreamInterrupted { message: String },

    /// Anything else reported by the HTTP layer.
    #[error("transport error: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Timeout for `operation` after `duration`.
    pub fn timeout(operation: &str, duration: Duration) -> Self {
        TransportError::Timeout {
            operation: operation.to_string(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Map an [`HttpError`] from the HTTP seam, attaching the request URL.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => TransportError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(message) => TransportError::Timeout {
                operation: message,
                duration_ms: 0,
            },
            HttpError::ServerError { status, message } => {
                TransportError::HttpStatus { status, message }
            }
            HttpError::Body(message) => TransportError::StreamInterrupted { message },
            HttpError::InvalidUrl(message) => TransportError::Other {
                message: format!("invalid URL '{}': {}", url, message),
            },
            HttpError::Other(message) => TransportError::Other { message },
        }
    }

    /// Whether the same request could reasonably succeed if retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed { .. } => true,
            TransportError::Timeout { .. } => true,
            TransportError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            TransportError::StreamInterrupted { .. } => true,
            TransportError::InvalidResponse { .. } => false,
            TransportError::Other { .. } => false,
        }
    }

    /// Short human-readable explanation.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::ConnectionFailed { .. } => {
                "Connection error. Please check that the assistant service is running.".to_string()
            }
            TransportError::Timeout { operation, .. } => {
                format!("The {} request timed out. Please try again.", operation)
            }
            TransportError::HttpStatus { status, .. } => match *status {
                404 => "The assistant endpoint was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The assistant service is having trouble. Please try again later."
                    .to_string(),
                _ => format!("The assistant service returned an error (HTTP {}).", status),
            },
            TransportError::InvalidResponse { .. } => {
                "Received an invalid response from the assistant service.".to_string()
            }
            TransportError::StreamInterrupted { .. } => {
                "The response stream was interrupted.".to_string()
            }
            TransportError::Other { message } => format!("Error talking to the assistant: {}", message),
        }
    }

    /// Short code used in structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed { .. } => "E_NET_CONN",
            TransportError::Timeout { .. } => "E_NET_TIMEOUT",
            TransportError::HttpStatus { .. } => "E_NET_HTTP",
            TransportError::InvalidResponse { .. } => "E_NET_INVALID",
            TransportError::StreamInterrupted { .. } => "E_NET_STREAM",
            TransportError::Other { .. } => "E_NET_OTHER",
        }
    }
}

/// Classify a reqwest error into an [`HttpError`].
pub fn classify_reqwest_error(err: &reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(err.to_string())
    } else if err.is_connect() {
        HttpError::ConnectionFailed(err.to_string())
    } else if err.is_body() || err.is_decode() {
        HttpError::Body(err.to_string())
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else if let Some(status) = err.status() {
        HttpError::ServerError {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        HttpError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_uses_millis() {
        let err = TransportError::timeout("submit", Duration::from_secs(10));
        assert_eq!(err.to_string(), "submit timed out after 10000 ms");
    }

    #[test]
    fn test_from_http_keeps_url_for_connect_failures() {
        let err = TransportError::from_http(
            HttpError::ConnectionFailed("refused".to_string()),
            "http://localhost:4110/chat-bot/chat",
        );
        assert_eq!(
            err,
            TransportError::ConnectionFailed {
                url: "http://localhost:4110/chat-bot/chat".to_string(),
                message: "refused".to_string(),
            }
        );
    }

    #[test]
    fn test_from_http_maps_server_errors_to_status() {
        let err = TransportError::from_http(
            HttpError::ServerError {
                status: 503,
                message: "busy".to_string(),
            },
            "http://x",
        );
        assert!(matches!(err, TransportError::HttpStatus { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_retryable_statuses() {
        let status = |s| TransportError::HttpStatus {
            status: s,
            message: String::new(),
        };
        assert!(status(500).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(408).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(404).is_retryable());
    }

    #[test]
    fn test_user_messages_are_not_empty() {
        let errors = vec![
            TransportError::ConnectionFailed {
                url: "u".to_string(),
                message: "m".to_string(),
            },
            TransportError::timeout("stream", Duration::from_millis(5)),
            TransportError::HttpStatus {
                status: 418,
                message: String::new(),
            },
            TransportError::InvalidResponse {
                message: "m".to_string(),
            },
            TransportError::StreamInterrupted {
                message: "m".to_string(),
            },
            TransportError::Other {
                message: "m".to_string(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
            assert!(err.error_code().starts_with("E_NET_"));
        }
    }
}
