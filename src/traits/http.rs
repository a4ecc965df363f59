//! HTTP client trait abstraction.
//!
//! The client needs exactly two requests: a JSON `POST` to submit a turn, and
//! a `GET` whose body is read incrementally as a server-sent event stream.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Incrementally received response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Errors reported by an [`HttpClient`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The body could not be read to completion.
    #[error("Body error: {0}")]
    Body(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for the HTTP operations the client performs.
///
/// ```ignore
/// use genie::traits::{HttpClient, Headers};
///
/// async fn ping<C: HttpClient>(client: &C) -> bool {
///     client
///         .post_json("http://localhost:4110/chat-bot/chat", "{}", &Headers::new())
///         .await
///         .map(|r| r.is_success())
///         .unwrap_or(false)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST a JSON body and buffer the whole response.
    ///
    /// Non-2xx statuses are returned as a `Response`, not an error.
    async fn post_json(&self, url: &str, body: &str, headers: &Headers)
        -> Result<Response, HttpError>;

    /// GET `url` and return its body as a byte stream.
    ///
    /// Non-2xx statuses are reported as [`HttpError::ServerError`].
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError>;
}
