//! Test doubles for the trait seams.
//!
//! - [`MockHttpClient`] - HTTP client with scripted submit and stream responses
//! - [`RecordingRenderer`] - renderer that keeps every callback

pub mod http;
pub mod render;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use render::RecordingRenderer;
