//! Plain-text terminal renderer.
//!
//! Streams the answer as it grows, printing only the new suffix of the draft.
//! When the backend replaces the text instead of extending it, the new text is
//! printed on a fresh line.

use std::io::Write;

use crate::models::{Message, Source};
use crate::state::DraftMessage;
use crate::traits::Renderer;

pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    /// Answer text already written for the current turn
    printed: String,
    status: Option<String>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: String::new(),
            status: None,
        }
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_text(&mut self, text: &str) {
        if let Some(suffix) = text.strip_prefix(self.printed.as_str()) {
            let _ = write!(self.out, "{}", suffix);
        } else {
            let _ = write!(self.out, "\n{}", text);
        }
        self.printed = text.to_string();
        let _ = self.out.flush();
    }

    fn print_sources(&mut self, sources: &[Source]) {
        if sources.is_empty() {
            return;
        }
        let _ = writeln!(self.out, "\nSources:");
        for (i, source) in sources.iter().enumerate() {
            let _ = writeln!(
                self.out,
                "  {}. {} ({}) {}",
                i + 1,
                source.title(),
                source.country(),
                source.url()
            );
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn draft_updated(&mut self, draft: &DraftMessage) {
        // Status lines only before the answer starts, so they never split it
        if self.printed.is_empty() {
            if let Some(status) = draft.thinking() {
                if self.status.as_deref() != Some(status) {
                    let _ = writeln!(self.out, "… {}", status);
                    self.status = Some(status.to_string());
                }
            }
        }
        if !draft.text().is_empty() {
            self.print_text(draft.text());
        }
    }

    fn turn_sealed(&mut self, message: &Message) {
        if let Some(genie) = message.as_genie() {
            if genie.text() != self.printed {
                self.print_text(genie.text());
            }
            let _ = writeln!(self.out);
            self.print_sources(genie.sources());
            if !genie.suggestions().is_empty() {
                let _ = writeln!(self.out, "\nSuggestions:");
                for (i, suggestion) in genie.suggestions().iter().enumerate() {
                    let _ = writeln!(self.out, "  /{} {}", i + 1, suggestion.label);
                }
            }
        }
        let _ = self.out.flush();
        self.printed.clear();
        self.status = None;
    }
}
