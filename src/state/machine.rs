//! Turn state machine.
//!
//! Consumes decoded events in arrival order and mutates the draft:
//!
//! ```text
//! AwaitingFirstFrame ──content_chunk──▶ StreamingText
//!        │                                   │
//!        └──────── terminal event ───────────┴──▶ Completing ──seal──▶ Sealed
//!
//! any non-sealed phase ──transport failure / timeout──▶ Aborted
//! ```

use crate::config::TerminalConvention;
use crate::models::{GenieMessage, Intent, Outcome, Source};
use crate::sse::GenieEvent;
use crate::state::draft::DraftMessage;

/// Text used when a handoff frame carries no text of its own.
pub const ASSISTANCE_REQUIRED_TEXT: &str =
    "Further assistance is required to continue this request.";

/// Used when an `error` frame has no message.
pub const UNKNOWN_ERROR_TEXT: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    AwaitingFirstFrame,
    StreamingText,
    Completing,
    Sealed,
    Aborted,
}

impl StreamPhase {
    /// No more events are accepted.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            StreamPhase::Completing | StreamPhase::Sealed | StreamPhase::Aborted
        )
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The draft may have changed; keep reading
    Applied,
    /// Unknown kind, or the turn is already closed
    Ignored,
    /// The turn is over and must be sealed
    Terminal(Outcome),
}

#[derive(Debug, Clone)]
pub struct TurnMachine {
    phase: StreamPhase,
    draft: DraftMessage,
    convention: TerminalConvention,
    site_url: String,
    outcome: Option<Outcome>,
}

impl TurnMachine {
    pub fn new(convention: TerminalConvention, site_url: impl Into<String>) -> Self {
        Self {
            phase: StreamPhase::AwaitingFirstFrame,
            draft: DraftMessage::new(),
            convention,
            site_url: site_url.into(),
            outcome: None,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn draft(&self) -> &DraftMessage {
        &self.draft
    }

    /// Outcome decided by a terminal event, if one has been seen.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn apply(&mut self, event: &GenieEvent) -> Step {
        if self.phase.is_closed() {
            return Step::Ignored;
        }

        match event {
            GenieEvent::StatusUpdate { message } => {
                if let Some(message) = message {
                    self.draft.set_thinking(message.clone());
                }
                Step::Applied
            }
            GenieEvent::ContentChunk {
                text_chunk,
                full_text,
            } => {
                match (full_text, text_chunk) {
                    (Some(full), _) => self.draft.replace_text(full.clone()),
                    (None, Some(fragment)) => self.draft.append_text(fragment),
                    (None, None) => {}
                }
                if self.phase == StreamPhase::AwaitingFirstFrame {
                    self.phase = StreamPhase::StreamingText;
                }
                Step::Applied
            }
            GenieEvent::AiResponseCompleted { sources, intent } => {
                let intent = Intent::new(intent.clone().unwrap_or_default());
                self.draft
                    .set_sources(Source::list_from_values(&intent, sources, &self.site_url));
                self.draft.set_intent(intent);
                match self.convention {
                    TerminalConvention::CompletedIsTerminal => self.complete(Outcome::Completed),
                    TerminalConvention::SummaryFollows => Step::Applied,
                }
            }
            GenieEvent::FinalSummary { text, suggestions } => {
                if let Some(text) = text.as_ref().filter(|t| !t.is_empty()) {
                    self.draft.replace_text(text.clone());
                }
                self.draft.set_suggestions(suggestions.clone());
                self.complete(Outcome::Completed)
            }
            GenieEvent::HandoffInitiated { text }
            | GenieEvent::InformationGatheringRequired { text } => {
                let text = text
                    .as_ref()
                    .filter(|t| !t.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| ASSISTANCE_REQUIRED_TEXT.to_string());
                self.draft.replace_text(text);
                self.complete(Outcome::HandedOff)
            }
            GenieEvent::StreamEnd => self.complete(Outcome::Completed),
            GenieEvent::Error { message, .. } => {
                let message = message
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(UNKNOWN_ERROR_TEXT);
                self.draft.replace_text(format!("Error: {}", message));
                self.complete(Outcome::Errored)
            }
            GenieEvent::Unknown { .. } => Step::Ignored,
        }
    }

    fn complete(&mut self, outcome: Outcome) -> Step {
        self.draft.mark_complete();
        self.phase = StreamPhase::Completing;
        self.outcome = Some(outcome.clone());
        Step::Terminal(outcome)
    }

    /// Seal after a terminal event, or best-effort when the stream ended without one.
    pub fn seal(&mut self) -> GenieMessage {
        let outcome = self.outcome.take().unwrap_or(Outcome::Interrupted);
        self.phase = StreamPhase::Sealed;
        std::mem::take(&mut self.draft).seal(outcome)
    }

    /// Seal after a transport failure or timeout.
    ///
    /// Text already streamed is kept; an empty draft gets an error text.
    pub fn abort(&mut self, reason: &str) -> GenieMessage {
        if let Some(outcome) = self.outcome.take() {
            // A terminal event was already applied; the failure came after it.
            self.phase = StreamPhase::Sealed;
            return std::mem::take(&mut self.draft).seal(outcome);
        }
        if self.draft.text().is_empty() {
            self.draft.replace_text(format!("Error: {}", reason));
        }
        self.phase = StreamPhase::Aborted;
        std::mem::take(&mut self.draft).seal(Outcome::Aborted {
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Suggestion;
    use serde_json::json;

    const SITE: &str = "https://edvoy.com";

    fn machine(convention: TerminalConvention) -> TurnMachine {
        TurnMachine::new(convention, SITE)
    }

    fn completed(count: usize, intent: &str) -> GenieEvent {
        GenieEvent::AiResponseCompleted {
            sources: (0..count)
                .map(|i| json!({"name": format!("s{}", i), "edpRefId": "x", "courseLevel": "Masters", "slug": format!("s{}", i)}))
                .collect(),
            intent: Some(intent.to_string()),
        }
    }

    #[test]
    fn test_chunks_concatenate_in_order() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        assert_eq!(m.phase(), StreamPhase::AwaitingFirstFrame);
        m.apply(&GenieEvent::chunk("Hello, "));
        assert_eq!(m.phase(), StreamPhase::StreamingText);
        m.apply(&GenieEvent::chunk("world"));
        assert_eq!(m.draft().text(), "Hello, world");
    }

    #[test]
    fn test_full_text_replaces() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("Helo"));
        m.apply(&GenieEvent::ContentChunk {
            text_chunk: Some("ignored".to_string()),
            full_text: Some("Hello".to_string()),
        });
        assert_eq!(m.draft().text(), "Hello");
        m.apply(&GenieEvent::chunk("!"));
        assert_eq!(m.draft().text(), "Hello!");
    }

    #[test]
    fn test_status_update_keeps_text_and_phase() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::StatusUpdate {
            message: Some("Thinking".to_string()),
        });
        assert_eq!(m.phase(), StreamPhase::AwaitingFirstFrame);
        m.apply(&GenieEvent::chunk("A"));
        m.apply(&GenieEvent::StatusUpdate {
            message: Some("Finding sources".to_string()),
        });
        assert_eq!(m.draft().text(), "A");
        assert_eq!(m.draft().thinking(), Some("Finding sources"));
        assert_eq!(m.phase(), StreamPhase::StreamingText);
    }

    #[test]
    fn test_completed_is_terminal_by_default_convention() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("Courses:"));
        let step = m.apply(&completed(2, "COURSE_SEARCH"));
        assert_eq!(step, Step::Terminal(Outcome::Completed));
        assert_eq!(m.phase(), StreamPhase::Completing);
        assert!(m.draft().is_complete());
        assert_eq!(m.draft().sources().len(), 2);
        assert_eq!(
            m.draft().sources()[0].url(),
            "https://edvoy.com/institutions/x/masters/s0/"
        );
    }

    #[test]
    fn test_completed_not_terminal_when_summary_follows() {
        let mut m = machine(TerminalConvention::SummaryFollows);
        m.apply(&GenieEvent::chunk("Draft text"));
        assert_eq!(m.apply(&completed(10, "COURSE_SEARCH")), Step::Applied);
        assert_eq!(m.phase(), StreamPhase::StreamingText);
        assert_eq!(m.draft().sources().len(), 5);
        assert!(!m.draft().is_complete());

        let step = m.apply(&GenieEvent::FinalSummary {
            text: Some("Final text".to_string()),
            suggestions: vec![Suggestion::new("More", "Show more")],
        });
        assert_eq!(step, Step::Terminal(Outcome::Completed));
        assert_eq!(m.draft().text(), "Final text");
        assert_eq!(m.draft().suggestions().len(), 1);
        assert_eq!(m.draft().intent().as_str(), "COURSE_SEARCH");
    }

    #[test]
    fn test_final_summary_without_text_keeps_streamed_text() {
        let mut m = machine(TerminalConvention::SummaryFollows);
        m.apply(&GenieEvent::chunk("Streamed"));
        m.apply(&GenieEvent::FinalSummary {
            text: None,
            suggestions: Vec::new(),
        });
        assert_eq!(m.draft().text(), "Streamed");
    }

    #[test]
    fn test_stream_end_completes_empty_draft() {
        let mut m = machine(TerminalConvention::SummaryFollows);
        assert_eq!(m.apply(&GenieEvent::StreamEnd), Step::Terminal(Outcome::Completed));
        let sealed = m.seal();
        assert_eq!(sealed.text(), "");
        assert!(sealed.is_complete());
        assert_eq!(m.phase(), StreamPhase::Sealed);
    }

    #[test]
    fn test_handoff_fallback_text() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("partial"));
        let step = m.apply(&GenieEvent::InformationGatheringRequired { text: None });
        assert_eq!(step, Step::Terminal(Outcome::HandedOff));
        assert_eq!(m.draft().text(), ASSISTANCE_REQUIRED_TEXT);

        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::HandoffInitiated {
            text: Some("A counsellor will contact you".to_string()),
        });
        assert_eq!(m.draft().text(), "A counsellor will contact you");
    }

    #[test]
    fn test_error_event_prefixes_message() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("partial"));
        let step = m.apply(&GenieEvent::Error {
            message: Some("model overloaded".to_string()),
            code: None,
        });
        assert_eq!(step, Step::Terminal(Outcome::Errored));
        assert_eq!(m.draft().text(), "Error: model overloaded");

        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::Error {
            message: None,
            code: None,
        });
        assert_eq!(m.draft().text(), "Error: Unknown error");
    }

    #[test]
    fn test_events_after_terminal_are_ignored() {
        let mut m = machine(TerminalConvention::SummaryFollows);
        m.apply(&GenieEvent::chunk("done"));
        m.apply(&GenieEvent::StreamEnd);
        assert_eq!(m.apply(&GenieEvent::chunk(" extra")), Step::Ignored);
        assert_eq!(
            m.apply(&GenieEvent::Error {
                message: Some("late".to_string()),
                code: None
            }),
            Step::Ignored
        );
        assert_eq!(m.draft().text(), "done");
    }

    #[test]
    fn test_unknown_kind_ignored() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        let step = m.apply(&GenieEvent::Unknown {
            kind: "tool_call".to_string(),
        });
        assert_eq!(step, Step::Ignored);
        assert_eq!(m.phase(), StreamPhase::AwaitingFirstFrame);
    }

    #[test]
    fn test_seal_without_terminal_is_interrupted() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("half an ans"));
        let sealed = m.seal();
        assert_eq!(sealed.text(), "half an ans");
        assert_eq!(sealed.outcome(), &Outcome::Interrupted);
        assert!(!sealed.is_complete());
    }

    #[test]
    fn test_abort_keeps_partial_text() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::chunk("partial"));
        let sealed = m.abort("stream timed out after 30000 ms");
        assert_eq!(sealed.text(), "partial");
        assert_eq!(
            sealed.outcome(),
            &Outcome::Aborted {
                reason: "stream timed out after 30000 ms".to_string()
            }
        );
        assert_eq!(m.phase(), StreamPhase::Aborted);
    }

    #[test]
    fn test_abort_on_empty_draft_sets_error_text() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        let sealed = m.abort("connection refused");
        assert_eq!(sealed.text(), "Error: connection refused");
    }

    #[test]
    fn test_university_intent_builds_university_sources() {
        let mut m = machine(TerminalConvention::CompletedIsTerminal);
        m.apply(&GenieEvent::AiResponseCompleted {
            sources: vec![json!({"name": "Derby", "refId": "derby"})],
            intent: Some("UNIVERSITY_SEARCH".to_string()),
        });
        assert_eq!(
            m.draft().sources()[0].url(),
            "https://edvoy.com/institutions/derby/"
        );
    }
}
