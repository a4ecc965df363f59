//! Render callbacks consumed from the surrounding UI.

use crate::models::Message;
use crate::state::DraftMessage;

/// Receives the live draft as it changes and the message once sealed.
///
/// Calls happen on the thread driving the turn, in stream order.
pub trait Renderer: Send {
    /// The in-flight draft changed.
    fn draft_updated(&mut self, draft: &DraftMessage);

    /// The turn finished and `message` was appended to history.
    fn turn_sealed(&mut self, message: &Message);
}

/// Renderer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draft_updated(&mut self, _draft: &DraftMessage) {}

    fn turn_sealed(&mut self, _message: &Message) {}
}
