//! Payload deserialization structs.
//!
//! Every field is optional so that partial frames still decode; only a field
//! of the wrong JSON type makes a payload invalid.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentChunkPayload {
    #[serde(default)]
    pub text_chunk: Option<String>,
    /// Full text so far; replaces rather than appends
    #[serde(default, alias = "accumulated_text")]
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusUpdatePayload {
    #[serde(default, alias = "status")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseCompletedPayload {
    #[serde(default)]
    pub data: Option<ResponseCompletedData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponseCompletedData {
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
    #[serde(default)]
    pub intent: Option<String>,
}

/// `final_summary` fields may sit at the root or under `data`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FinalSummaryPayload {
    #[serde(flatten)]
    pub root: FinalSummaryFields,
    #[serde(default)]
    pub data: Option<FinalSummaryFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FinalSummaryFields {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub final_text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Value>,
}

impl FinalSummaryFields {
    pub fn authoritative_text(&self) -> Option<String> {
        self.final_text
            .clone()
            .or_else(|| self.text.clone())
            .or_else(|| self.message.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HandoffPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    /// Backends send both string and numeric codes
    #[serde(default)]
    pub code: Option<Value>,
}

impl ErrorPayload {
    pub fn code_text(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
