use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A follow-up the user can trigger instead of typing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    /// Text shown on the button / list entry
    pub label: String,
    /// Message sent when the suggestion is chosen
    pub prompt: String,
    /// Opaque key forwarded to the backend with the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_key: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
            action_key: None,
        }
    }

    pub fn with_action_key(mut self, action_key: impl Into<String>) -> Self {
        self.action_key = Some(action_key.into());
        self
    }

    /// Read a suggestion from a backend value.
    ///
    /// Accepts a bare string or an object. Returns `None` when neither a
    /// label nor a prompt can be found.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Some(text) = value.as_str() {
            let text = text.trim();
            return (!text.is_empty()).then(|| Self::new(text, text));
        }

        let field = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| value.get(name).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };

        let label = field(&["label", "title", "text"]);
        let prompt = field(&["prompt", "message", "query"]);
        let (label, prompt) = match (label, prompt) {
            (Some(label), Some(prompt)) => (label, prompt),
            (Some(label), None) => (label.clone(), label),
            (None, Some(prompt)) => (prompt.clone(), prompt),
            (None, None) => return None,
        };

        Some(Self {
            label,
            prompt,
            action_key: field(&["action_key", "actionKey"]),
        })
    }

    /// Read every usable suggestion from a JSON array; anything else yields none.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }
}
