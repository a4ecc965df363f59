#![allow(dead_code)]

//! Shared fixtures for integration tests.
//!
//! ```ignore
//! mod common;
//! use common::*;
//!
//! let (mut client, http) = scripted_client(GenieConfig::default());
//! http.set_response(STREAM_PREFIX, MockResponse::sse([chunk("Hi"), stream_end()]));
//! ```

pub mod mocks;

pub use mocks::*;

use serde_json::json;

pub fn chunk(text: &str) -> String {
    json!({"type": "content_chunk", "text_chunk": text}).to_string()
}

pub fn status(message: &str) -> String {
    json!({"type": "status_update", "message": message}).to_string()
}

/// `ai_response_completed` with `count` course sources.
pub fn completed_with_courses(count: usize) -> String {
    let sources: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "name": format!("Course {}", i),
                "institution": {"name": "University of Derby", "address": {"country": "United Kingdom"}},
                "edpRefId": "university-of-derby",
                "courseLevel": "Masters",
                "slug": format!("course-{}", i),
            })
        })
        .collect();
    json!({
        "type": "ai_response_completed",
        "data": {"sources": sources, "intent": "COURSE_SEARCH"}
    })
    .to_string()
}

pub fn final_summary(text: &str, suggestions: &[(&str, &str)]) -> String {
    let suggestions: Vec<_> = suggestions
        .iter()
        .map(|(label, prompt)| json!({"label": label, "prompt": prompt}))
        .collect();
    json!({"type": "final_summary", "text": text, "suggestions": suggestions}).to_string()
}

pub fn stream_end() -> String {
    json!({"type": "stream_end"}).to_string()
}

/// SSE body with one `data:` line per payload.
pub fn sse_body(payloads: &[String]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect()
}
