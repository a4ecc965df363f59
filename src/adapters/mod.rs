//! Concrete implementations of the trait seams.
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`mock`] - test doubles for the HTTP client and renderer

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse, RecordingRenderer};
pub use reqwest_http::ReqwestHttpClient;
