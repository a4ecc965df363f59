//! Chat stream decoding.
//!
//! The stream is a line-oriented server-sent-event body. Each meaningful
//! line is `data: <json>` where the JSON object's `type` selects the event.
//! Blank lines, `:` comments and heartbeats are skipped.
//!
//! # Module structure
//! - `events` - `GenieEvent` and `EventKind`
//! - `payloads` - internal payload deserialization structs
//! - `decoder` - line classification and JSON decoding
//! - `stream` - byte stream to frame stream

mod decoder;
mod events;
mod payloads;
mod stream;

pub use decoder::{classify_line, decode_payload, FrameDecoder, LineKind};
pub use events::{EventKind, GenieEvent};
pub use stream::{frames, Frame, FrameStream, MAX_LINE_BYTES};
