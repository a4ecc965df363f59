//! Frame decoding errors.
//!
//! A `DecodeError` never aborts a stream. The decoder reports it, the driver
//! logs it and moves on to the next line.

use thiserror::Error;

/// Longest slice of an offending line kept inside an error.
const MAX_LINE_EXCERPT: usize = 120;

/// A stream line that could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("invalid JSON frame: {message} (line: {line})")]
    InvalidJson { line: String, message: String },

    /// The payload is JSON but carries no string `type` field.
    #[error("frame has no event type (line: {line})")]
    MissingKind { line: String },

    /// The payload has a known `type` but a field has the wrong shape.
    #[error("invalid '{kind}' payload: {message}")]
    InvalidPayload { kind: String, message: String },

    /// A line grew past the buffer limit before its newline arrived.
    #[error("line exceeds {limit} bytes and was dropped")]
    LineTooLong { limit: usize },
}

impl DecodeError {
    /// Build an `InvalidJson` error, keeping only an excerpt of the line.
    pub fn invalid_json(line: &str, err: &serde_json::Error) -> Self {
        DecodeError::InvalidJson {
            line: excerpt(line),
            message: err.to_string(),
        }
    }

    /// Build a `MissingKind` error, keeping only an excerpt of the line.
    pub fn missing_kind(line: &str) -> Self {
        DecodeError::MissingKind {
            line: excerpt(line),
        }
    }

    /// Build an `InvalidPayload` error for the given event type.
    pub fn invalid_payload(kind: &str, err: &serde_json::Error) -> Self {
        DecodeError::InvalidPayload {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }

    /// Short code used in structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            DecodeError::InvalidJson { .. } => "E_DECODE_JSON",
            DecodeError::MissingKind { .. } => "E_DECODE_KIND",
            DecodeError::InvalidPayload { .. } => "E_DECODE_PAYLOAD",
            DecodeError::LineTooLong { .. } => "E_DECODE_LINE_TOO_LONG",
        }
    }
}

fn excerpt(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_EXCERPT {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(MAX_LINE_EXCERPT).collect();
    cut.push('…');
    cut
}
