//! Line-level frame decoding.
//!
//! Each meaningful stream line looks like `data: {"type": "...", ...}`.
//! Everything else (blank lines, `:` comments, heartbeats, other SSE fields)
//! is protocol noise and produces no event.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::models::Suggestion;
use crate::sse::events::{EventKind, GenieEvent};
use crate::sse::payloads::{
    ContentChunkPayload, ErrorPayload, FinalSummaryPayload, HandoffPayload,
    ResponseCompletedPayload, StatusUpdatePayload,
};

/// SSE fields other than `data:` that carry nothing for this protocol.
const IGNORED_FIELDS: [&str; 3] = ["event:", "id:", "retry:"];

/// Classification of a raw line before JSON decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank, comment, heartbeat, or an ignored SSE field
    Noise,
    /// JSON text to decode
    Payload(&'a str),
}

/// Classify a raw line.
pub fn classify_line(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    // ":" alone, ":heartbeat…", and any other SSE comment
    if line.is_empty() || line.starts_with(':') {
        return LineKind::Noise;
    }
    if IGNORED_FIELDS.iter().any(|field| line.starts_with(field)) {
        return LineKind::Noise;
    }

    let payload = match line.strip_prefix("data:") {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim(),
        None => line,
    };
    if payload.is_empty() {
        LineKind::Noise
    } else {
        LineKind::Payload(payload)
    }
}

/// Decode a JSON payload into an event.
pub fn decode_payload(payload: &str) -> Result<GenieEvent, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::invalid_json(payload, &e))?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::missing_kind(payload))?
        .to_string();

    match EventKind::parse(&kind) {
        Some(known) => parse_event(known, value),
        None => Ok(GenieEvent::Unknown { kind }),
    }
}

fn parse_event(kind: EventKind, value: Value) -> Result<GenieEvent, DecodeError> {
    let event = match kind {
        EventKind::StatusUpdate => {
            let p: StatusUpdatePayload = payload(kind, value)?;
            GenieEvent::StatusUpdate { message: p.message }
        }
        EventKind::ContentChunk => {
            let p: ContentChunkPayload = payload(kind, value)?;
            GenieEvent::ContentChunk {
                text_chunk: p.text_chunk,
                full_text: p.full_text,
            }
        }
        EventKind::AiResponseCompleted => {
            let data = payload::<ResponseCompletedPayload>(kind, value)?
                .data
                .unwrap_or_default();
            GenieEvent::AiResponseCompleted {
                sources: data.sources.unwrap_or_default(),
                intent: data.intent,
            }
        }
        EventKind::FinalSummary => {
            let p: FinalSummaryPayload = payload(kind, value)?;
            let nested = p.data.unwrap_or_default();
            let text = p.root.authoritative_text().or_else(|| nested.authoritative_text());
            let suggestions = p
                .root
                .suggestions
                .or(nested.suggestions)
                .map(|v| Suggestion::list_from_value(&v))
                .unwrap_or_default();
            GenieEvent::FinalSummary { text, suggestions }
        }
        EventKind::HandoffInitiated => {
            let p: HandoffPayload = payload(kind, value)?;
            GenieEvent::HandoffInitiated {
                text: p.message.or(p.text),
            }
        }
        EventKind::InformationGatheringRequired => {
            let p: HandoffPayload = payload(kind, value)?;
            GenieEvent::InformationGatheringRequired {
                text: p.message.or(p.text),
            }
        }
        EventKind::StreamEnd => GenieEvent::StreamEnd,
        EventKind::Error => {
            let p: ErrorPayload = payload(kind, value)?;
            GenieEvent::Error {
                code: p.code_text(),
                message: p.message,
            }
        }
    };
    Ok(event)
}

fn payload<T: DeserializeOwned>(kind: EventKind, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::invalid_payload(kind.as_str(), &e))
}

/// Stateful decoder that counts what it has seen.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    events: usize,
    noise: usize,
    malformed: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one line.
    ///
    /// Returns:
    /// - `Ok(Some(event))` - a frame was decoded
    /// - `Ok(None)` - the line was protocol noise
    /// - `Err(error)` - the line was malformed and should be skipped
    pub fn decode_line(&mut self, line: &str) -> Result<Option<GenieEvent>, DecodeError> {
        match classify_line(line) {
            LineKind::Noise => {
                self.noise += 1;
                Ok(None)
            }
            LineKind::Payload(payload) => match decode_payload(payload) {
                Ok(event) => {
                    self.events += 1;
                    Ok(Some(event))
                }
                Err(err) => {
                    self.malformed += 1;
                    Err(err)
                }
            },
        }
    }

    /// Record a line dropped for exceeding `limit` bytes.
    pub fn line_too_long(&mut self, limit: usize) -> DecodeError {
        self.malformed += 1;
        DecodeError::LineTooLong { limit }
    }

    pub fn events(&self) -> usize {
        self.events
    }

    pub fn noise(&self) -> usize {
        self.noise
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }
}
