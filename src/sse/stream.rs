//! Byte stream to frame stream.
//!
//! Splits the response body on `\n` and decodes each complete line. UTF-8 is
//! decoded per line, so a multi-byte character split across two network
//! chunks is reassembled before decoding.
//!
//! The idle timeout applies to every body read, so heartbeats and other
//! noise keep a quiet stream alive even though they never become frames.

use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::error::DecodeError;
use crate::sse::decoder::FrameDecoder;
use crate::sse::events::GenieEvent;
use crate::traits::{ByteStream, HttpError};

/// Longest line kept in memory while waiting for its newline.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Item produced for every meaningful line.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Event(GenieEvent),
    /// The line was skipped; the error is kept so it can be logged.
    Malformed(DecodeError),
}

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Frame, HttpError>> + Send>>;

struct Framer {
    body: ByteStream,
    buffer: Vec<u8>,
    decoder: FrameDecoder,
    idle: Duration,
    max_line: usize,
    /// Dropping the rest of an oversized line up to its newline
    skipping: bool,
    body_done: bool,
}

impl Framer {
    /// Pop the next complete line, discarding the tail of an oversized one.
    fn next_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();
        if self.skipping {
            self.skipping = false;
            return self.next_line();
        }
        Some(line)
    }
}

/// Turn a response body into a lazy, one-pass stream of frames.
///
/// Noise lines are consumed silently. A body error, or no bytes at all for
/// `idle`, is yielded once as an `Err` and ends the stream. The idle case is
/// reported as [`HttpError::Timeout`].
pub fn frames(body: ByteStream, idle: Duration) -> FrameStream {
    frames_with_limit(body, idle, MAX_LINE_BYTES)
}

pub(crate) fn frames_with_limit(body: ByteStream, idle: Duration, max_line: usize) -> FrameStream {
    let framer = Framer {
        body,
        buffer: Vec::new(),
        decoder: FrameDecoder::new(),
        idle,
        max_line,
        skipping: false,
        body_done: false,
    };

    Box::pin(stream::unfold(framer, |mut framer| async move {
        loop {
            if let Some(line) = framer.next_line() {
                let text = String::from_utf8_lossy(&line);
                match framer.decoder.decode_line(&text) {
                    Ok(Some(event)) => return Some((Ok(Frame::Event(event)), framer)),
                    Ok(None) => continue,
                    Err(err) => return Some((Ok(Frame::Malformed(err)), framer)),
                }
            }

            if framer.skipping {
                framer.buffer.clear();
            } else if framer.buffer.len() > framer.max_line {
                framer.buffer.clear();
                framer.skipping = !framer.body_done;
                let err = framer.decoder.line_too_long(framer.max_line);
                return Some((Ok(Frame::Malformed(err)), framer));
            }

            if framer.body_done {
                if framer.buffer.is_empty() {
                    return None;
                }
                // Final line without a trailing newline
                framer.buffer.push(b'\n');
                continue;
            }

            match tokio::time::timeout(framer.idle, framer.body.next()).await {
                Ok(Some(Ok(chunk))) => framer.buffer.extend_from_slice(&chunk),
                Ok(Some(Err(err))) => {
                    framer.body_done = true;
                    framer.buffer.clear();
                    return Some((Err(err), framer));
                }
                Ok(None) => framer.body_done = true,
                Err(_) => {
                    framer.body_done = true;
                    framer.buffer.clear();
                    let err = HttpError::Timeout(format!(
                        "no data for {} ms",
                        framer.idle.as_millis()
                    ));
                    return Some((Err(err), framer));
                }
            }
        }
    }))
}
