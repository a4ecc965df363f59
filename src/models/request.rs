use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat-bot/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Conversation the message belongs to
    pub session_id: String,
    /// The user's message, already trimmed
    pub message: String,
    /// Structured context the backend may use for retrieval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Set when the turn was triggered by a suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_key: Option<String>,
}

impl ChatRequest {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            metadata: None,
            action_key: None,
        }
    }

    /// Attach context metadata (builder pattern)
    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach the action key of the suggestion that triggered this turn (builder pattern)
    pub fn with_action_key(mut self, action_key: Option<String>) -> Self {
        self.action_key = action_key.filter(|key| !key.is_empty());
        self
    }
}

/// Body of a successful submit response.
///
/// Session-scoped backends answer with an empty object (or no body at all);
/// task-scoped backends return the id of the stream to open.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubmitAccepted {
    #[serde(default)]
    pub task_id: Option<String>,
}

impl SubmitAccepted {
    /// Parse a submit response body; an empty body is an empty acceptance.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    /// The task id, if present and non-empty.
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_skips_absent_fields() {
        let request = ChatRequest::new("s-1", "Hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"session_id": "s-1", "message": "Hello"}));
    }

    #[test]
    fn test_chat_request_with_metadata_and_action_key() {
        let request = ChatRequest::new("s-1", "Show me courses")
            .with_metadata(Some(json!({"country": "United Kingdom"})))
            .with_action_key(Some("SHOW_COURSES".to_string()));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["metadata"]["country"], "United Kingdom");
        assert_eq!(value["action_key"], "SHOW_COURSES");
    }

    #[test]
    fn test_empty_action_key_is_dropped() {
        let request = ChatRequest::new("s-1", "Hi").with_action_key(Some(String::new()));
        assert_eq!(request.action_key, None);
    }

    #[test]
    fn test_submit_accepted_empty_body() {
        let accepted = SubmitAccepted::from_body(b"  ").unwrap();
        assert_eq!(accepted.task_id(), None);
    }

    #[test]
    fn test_submit_accepted_task_id() {
        let accepted = SubmitAccepted::from_body(br#"{"task_id":"task-9","status":"queued"}"#).unwrap();
        assert_eq!(accepted.task_id(), Some("task-9"));

        let blank = SubmitAccepted::from_body(br#"{"task_id":""}"#).unwrap();
        assert_eq!(blank.task_id(), None);
    }
}
