//! Conversation data model: messages, sources, suggestions, wire requests.

mod message;
mod request;
mod source;
mod suggestion;

pub use message::{GenieMessage, Message, Outcome, UserMessage};
pub use request::{ChatRequest, SubmitAccepted};
pub use source::{
    course_url, university_url, CourseSource, Intent, Source, UniversitySource, MAX_SOURCES,
    UNIVERSITY_SEARCH, UNKNOWN_COUNTRY, UNKNOWN_COURSE, UNKNOWN_UNIVERSITY,
};
pub use suggestion::Suggestion;
