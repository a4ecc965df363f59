//! Renderer that records callbacks.

use crate::models::Message;
use crate::state::DraftMessage;
use crate::traits::Renderer;

#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    /// Draft text after every update, in order
    pub drafts: Vec<String>,
    /// Status text after every update, in order
    pub statuses: Vec<Option<String>>,
    pub sealed: Vec<Message>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn draft_updated(&mut self, draft: &DraftMessage) {
        self.drafts.push(draft.text().to_string());
        self.statuses.push(draft.thinking().map(str::to_string));
    }

    fn turn_sealed(&mut self, message: &Message) {
        self.sealed.push(message.clone());
    }
}
