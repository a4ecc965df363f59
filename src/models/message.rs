use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::{Intent, Source};
use super::suggestion::Suggestion;

/// How an assistant turn ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A terminal frame closed the answer normally
    Completed,
    /// The backend sent an `error` frame
    Errored,
    /// The backend handed the conversation off or asked for more information
    HandedOff,
    /// The stream ended before any terminal frame
    Interrupted,
    /// Transport failure or timeout while streaming
    Aborted { reason: String },
}

impl Outcome {
    /// Whether the backend itself declared the turn finished.
    pub fn is_terminal_frame(&self) -> bool {
        matches!(self, Outcome::Completed | Outcome::Errored | Outcome::HandedOff)
    }
}

/// A message typed by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMessage {
    pub text: String,
    /// Present when the turn came from a suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A sealed assistant answer. Fields are read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenieMessage {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thinking: Option<String>,
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    suggestions: Vec<Suggestion>,
    #[serde(default)]
    intent: Intent,
    complete: bool,
    outcome: Outcome,
    created_at: DateTime<Utc>,
}

impl GenieMessage {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn sealed(
        text: String,
        thinking: Option<String>,
        sources: Vec<Source>,
        suggestions: Vec<Suggestion>,
        intent: Intent,
        complete: bool,
        outcome: Outcome,
    ) -> Self {
        Self {
            text,
            thinking,
            sources,
            suggestions,
            intent,
            complete,
            outcome,
            created_at: Utc::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last status trace seen while streaming, kept for debugging.
    pub fn thinking(&self) -> Option<&str> {
        self.thinking.as_deref()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One entry in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "sender", rename_all = "lowercase")]
pub enum Message {
    User(UserMessage),
    Genie(GenieMessage),
}

impl Message {
    pub fn user(text: impl Into<String>, action_key: Option<String>) -> Self {
        Message::User(UserMessage {
            text: text.into(),
            action_key,
            created_at: Utc::now(),
        })
    }

    pub fn text(&self) -> &str {
        match self {
            Message::User(m) => &m.text,
            Message::Genie(m) => m.text(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    pub fn as_genie(&self) -> Option<&GenieMessage> {
        match self {
            Message::Genie(m) => Some(m),
            Message::User(_) => None,
        }
    }
}
