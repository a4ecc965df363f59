//! Typed events carried by the chat stream.

use serde_json::Value;

use crate::models::Suggestion;

/// Event type names as they appear in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StatusUpdate,
    ContentChunk,
    AiResponseCompleted,
    FinalSummary,
    HandoffInitiated,
    InformationGatheringRequired,
    StreamEnd,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::StatusUpdate,
        EventKind::ContentChunk,
        EventKind::AiResponseCompleted,
        EventKind::FinalSummary,
        EventKind::HandoffInitiated,
        EventKind::InformationGatheringRequired,
        EventKind::StreamEnd,
        EventKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::StatusUpdate => "status_update",
            EventKind::ContentChunk => "content_chunk",
            EventKind::AiResponseCompleted => "ai_response_completed",
            EventKind::FinalSummary => "final_summary",
            EventKind::HandoffInitiated => "handoff_initiated",
            EventKind::InformationGatheringRequired => "information_gathering_required",
            EventKind::StreamEnd => "stream_end",
            EventKind::Error => "error",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GenieEvent {
    /// Progress text shown while the answer is being prepared
    StatusUpdate { message: Option<String> },
    /// Incremental text, or the full text so far when `full_text` is set
    ContentChunk {
        text_chunk: Option<String>,
        full_text: Option<String>,
    },
    /// Retrieval results and intent classification
    AiResponseCompleted {
        sources: Vec<Value>,
        intent: Option<String>,
    },
    /// Authoritative final text and follow-up suggestions
    FinalSummary {
        text: Option<String>,
        suggestions: Vec<Suggestion>,
    },
    HandoffInitiated { text: Option<String> },
    InformationGatheringRequired { text: Option<String> },
    StreamEnd,
    Error {
        message: Option<String>,
        code: Option<String>,
    },
    /// A well-formed frame whose type this client does not handle
    Unknown { kind: String },
}

impl GenieEvent {
    /// Known kind of this event, `None` for [`GenieEvent::Unknown`].
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            GenieEvent::StatusUpdate { .. } => Some(EventKind::StatusUpdate),
            GenieEvent::ContentChunk { .. } => Some(EventKind::ContentChunk),
            GenieEvent::AiResponseCompleted { .. } => Some(EventKind::AiResponseCompleted),
            GenieEvent::FinalSummary { .. } => Some(EventKind::FinalSummary),
            GenieEvent::HandoffInitiated { .. } => Some(EventKind::HandoffInitiated),
            GenieEvent::InformationGatheringRequired { .. } => {
                Some(EventKind::InformationGatheringRequired)
            }
            GenieEvent::StreamEnd => Some(EventKind::StreamEnd),
            GenieEvent::Error { .. } => Some(EventKind::Error),
            GenieEvent::Unknown { .. } => None,
        }
    }

    /// Type name for logging.
    pub fn type_name(&self) -> &str {
        match self {
            GenieEvent::Unknown { kind } => kind,
            other => other.kind().map(EventKind::as_str).unwrap_or("unknown"),
        }
    }

    /// Shorthand for an incremental text chunk.
    pub fn chunk(text: impl Into<String>) -> Self {
        GenieEvent::ContentChunk {
            text_chunk: Some(text.into()),
            full_text: None,
        }
    }
}
