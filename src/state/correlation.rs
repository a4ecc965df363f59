//! Conversation identity and the pending-turn marker.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StateError;

/// Opaque per-conversation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of one turn's stream.
///
/// Session-scoped and task-scoped ids are distinct variants so one can never
/// be passed where the other is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CorrelationId {
    /// The session id addresses the stream
    Session(SessionId),
    /// A per-turn task id returned by the submit call
    Task(String),
}

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        match self {
            CorrelationId::Session(session) => session.as_str(),
            CorrelationId::Task(task) => task,
        }
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the session and whether a turn is currently pending.
///
/// Invariant: a turn is pending exactly when an active correlation id is set.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    session: SessionId,
    active: Option<CorrelationId>,
}

impl CorrelationContext {
    pub fn new() -> Self {
        Self {
            session: SessionId::generate(),
            active: None,
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn active(&self) -> Option<&CorrelationId> {
        self.active.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.active.is_some()
    }

    /// Mint a new session id, distinct from the current one, and drop any pending turn.
    pub fn start_conversation(&mut self) -> &SessionId {
        let mut next = SessionId::generate();
        while next == self.session {
            next = SessionId::generate();
        }
        self.session = next;
        self.active = None;
        &self.session
    }

    /// Mark a turn as pending on `correlation_id`.
    pub fn begin_turn(&mut self, correlation_id: CorrelationId) -> Result<(), StateError> {
        if let Some(active) = &self.active {
            return Err(StateError::TurnPending {
                correlation_id: active.to_string(),
            });
        }
        self.active = Some(correlation_id);
        Ok(())
    }

    /// Clear the pending turn. Calling it with nothing pending is a no-op.
    pub fn end_turn(&mut self) -> Option<CorrelationId> {
        self.active.take()
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}
