//! Conversation state: identity, history and the pending turn.

mod conversation;
mod correlation;
mod draft;
mod history;
mod machine;

pub use conversation::ConversationState;
pub use correlation::{CorrelationContext, CorrelationId, SessionId};
pub use draft::DraftMessage;
pub use history::HistoryStore;
pub use machine::{StreamPhase, Step, TurnMachine, ASSISTANCE_REQUIRED_TEXT, UNKNOWN_ERROR_TEXT};
