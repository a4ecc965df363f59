//! The in-flight assistant message.

use crate::models::{GenieMessage, Intent, Outcome, Source, Suggestion, MAX_SOURCES};

/// Work-in-progress assistant answer for the pending turn.
///
/// Only the turn state machine mutates it; everyone else sees it through
/// shared references until it is sealed into a [`GenieMessage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftMessage {
    text: String,
    thinking: Option<String>,
    sources: Vec<Source>,
    suggestions: Vec<Suggestion>,
    intent: Intent,
    complete: bool,
}

impl DraftMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn thinking(&self) -> Option<&str> {
        self.thinking.as_deref()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn set_thinking(&mut self, status: String) {
        self.thinking = Some(status);
    }

    pub(crate) fn append_text(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub(crate) fn replace_text(&mut self, text: String) {
        self.text = text;
    }

    /// Keeps the first [`MAX_SOURCES`] entries.
    pub(crate) fn set_sources(&mut self, mut sources: Vec<Source>) {
        sources.truncate(MAX_SOURCES);
        self.sources = sources;
    }

    pub(crate) fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Freeze the draft into an immutable message.
    pub(crate) fn seal(self, outcome: Outcome) -> GenieMessage {
        GenieMessage::sealed(
            self.text,
            self.thinking,
            self.sources,
            self.suggestions,
            self.intent,
            self.complete,
            outcome,
        )
    }
}
