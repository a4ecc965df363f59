//! Trait seams for dependency injection and testability.
//!
//! - [`HttpClient`] - submit requests and open event streams
//! - [`Renderer`] - receives draft updates and sealed messages

pub mod http;
pub mod render;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use render::{NullRenderer, Renderer};
