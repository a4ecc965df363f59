//! Ordered log of finalized messages.

use crate::models::Message;

/// Append-only conversation log.
///
/// The only removals are a full [`clear`](HistoryStore::clear) on reset and
/// [`rollback_user`](HistoryStore::rollback_user) when a submission fails.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    messages: Vec<Message>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove the newest entry if it is a user message.
    pub fn rollback_user(&mut self) -> Option<Message> {
        match self.messages.last() {
            Some(last) if last.is_user() => self.messages.pop(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// History as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.messages)
    }
}
