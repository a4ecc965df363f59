//! Unified error type.

use thiserror::Error;

use super::decode::DecodeError;
use super::transport::TransportError;

/// Input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The message was empty or whitespace only.
    #[error("message is empty")]
    EmptyMessage,
}

/// Operation not allowed in the current turn state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A turn is already streaming for this conversation.
    #[error("a response is already pending (correlation id {correlation_id})")]
    TurnPending { correlation_id: String },

    /// An event arrived but no turn is in flight.
    #[error("no turn is pending")]
    NoActiveTurn,
}

/// Coarse classification of a [`GenieError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Decode,
    State,
}

/// Any error the Genie client can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenieError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Raised when a caller decodes lines itself and lifts the error with
    /// `?`. The stream driver never returns it; malformed frames stay inside
    /// `Frame::Malformed` and are counted in the turn report.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GenieError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenieError::Validation(_) => ErrorKind::Validation,
            GenieError::Transport(_) => ErrorKind::Transport,
            GenieError::Decode(_) => ErrorKind::Decode,
            GenieError::State(_) => ErrorKind::State,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            GenieError::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Message suitable for showing to the person typing.
    pub fn user_message(&self) -> String {
        match self {
            GenieError::Validation(ValidationError::EmptyMessage) => {
                "Please type a message first.".to_string()
            }
            GenieError::Transport(err) => err.user_message(),
            GenieError::Decode(_) => "Skipped a malformed message from the server.".to_string(),
            GenieError::State(StateError::TurnPending { .. }) => {
                "Please wait for the current response to complete before sending another message."
                    .to_string()
            }
            GenieError::State(StateError::NoActiveTurn) => {
                "There is no response in progress.".to_string()
            }
        }
    }
}
