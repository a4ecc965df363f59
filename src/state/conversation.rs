//! Owned per-conversation state.
//!
//! `ConversationState` bundles the correlation context, the history and the
//! machine of the pending turn. The async driver in [`crate::client`] owns one
//! and calls into it; nothing here touches the network.

use serde_json::Value;

use crate::config::{GenieConfig, TerminalConvention, DEFAULT_SITE_URL};
use crate::error::{GenieError, StateError, ValidationError};
use crate::models::{ChatRequest, Message};
use crate::sse::GenieEvent;
use crate::state::correlation::{CorrelationContext, CorrelationId, SessionId};
use crate::state::draft::DraftMessage;
use crate::state::history::HistoryStore;
use crate::state::machine::{Step, TurnMachine};

#[derive(Debug, Clone)]
pub struct ConversationState {
    correlation: CorrelationContext,
    history: HistoryStore,
    turn: Option<TurnMachine>,
    convention: TerminalConvention,
    site_url: String,
}

impl ConversationState {
    pub fn new(convention: TerminalConvention, site_url: impl Into<String>) -> Self {
        Self {
            correlation: CorrelationContext::new(),
            history: HistoryStore::new(),
            turn: None,
            convention,
            site_url: site_url.into(),
        }
    }

    pub fn with_config(config: &GenieConfig) -> Self {
        Self::new(config.terminal, config.site_url.clone())
    }

    pub fn session(&self) -> &SessionId {
        self.correlation.session()
    }

    pub fn correlation(&self) -> &CorrelationContext {
        &self.correlation
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Live draft of the pending turn.
    pub fn draft(&self) -> Option<&DraftMessage> {
        self.turn.as_ref().map(TurnMachine::draft)
    }

    pub fn turn(&self) -> Option<&TurnMachine> {
        self.turn.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.correlation.is_pending()
    }

    /// Reset: new session id, empty history, nothing pending.
    pub fn start_conversation(&mut self) -> &SessionId {
        self.history.clear();
        self.turn = None;
        let session = self.correlation.start_conversation();
        tracing::info!(session_id = %session, "started new conversation");
        session
    }

    /// Validate the input, record the user message and build the submit body.
    ///
    /// Emptiness is checked first so blank input never depends on turn state.
    pub fn stage_user_message(
        &mut self,
        text: &str,
        action_key: Option<String>,
        metadata: Option<Value>,
    ) -> Result<ChatRequest, GenieError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        if let Some(active) = self.correlation.active() {
            return Err(StateError::TurnPending {
                correlation_id: active.to_string(),
            }
            .into());
        }

        self.history.push(Message::user(text, action_key.clone()));
        Ok(ChatRequest::new(self.session().as_str(), text)
            .with_metadata(metadata)
            .with_action_key(action_key))
    }

    /// Drop the user message staged for a submission that failed.
    pub fn rollback_user_message(&mut self) -> Option<Message> {
        let removed = self.history.rollback_user();
        if removed.is_some() {
            tracing::debug!("rolled back unsent user message");
        }
        removed
    }

    /// Mark a turn pending and create its draft.
    pub fn begin_turn(&mut self, correlation_id: CorrelationId) -> Result<(), StateError> {
        self.correlation.begin_turn(correlation_id)?;
        self.turn = Some(TurnMachine::new(self.convention, self.site_url.clone()));
        Ok(())
    }

    pub fn apply(&mut self, event: &GenieEvent) -> Result<Step, StateError> {
        let turn = self.turn.as_mut().ok_or(StateError::NoActiveTurn)?;
        Ok(turn.apply(event))
    }

    /// Seal the draft, append it to history and end the turn.
    ///
    /// Without a prior terminal event the message is sealed as interrupted.
    pub fn seal_turn(&mut self) -> Result<Message, StateError> {
        let mut turn = self.turn.take().ok_or(StateError::NoActiveTurn)?;
        Ok(self.finish(Message::Genie(turn.seal())))
    }

    /// Seal the draft after a stream-phase failure.
    pub fn abort_turn(&mut self, reason: &str) -> Result<Message, StateError> {
        let mut turn = self.turn.take().ok_or(StateError::NoActiveTurn)?;
        Ok(self.finish(Message::Genie(turn.abort(reason))))
    }

    fn finish(&mut self, message: Message) -> Message {
        self.history.push(message.clone());
        self.correlation.end_turn();
        message
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(TerminalConvention::default(), DEFAULT_SITE_URL)
    }
}
