//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL; every request is recorded so tests can
//! assert on what was sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use futures_util::StreamExt;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// GET or POST
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// Present for POST requests
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response to a POST
    Success(Response),
    /// Fail the request outright
    Error(HttpError),
    /// Stream body made of these chunks, then end of stream
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail the body with the error
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream these chunks, then never produce another one
    StreamThenStall(Vec<Bytes>),
    /// Stream these chunks, waiting before each one
    Paced(Vec<Bytes>, Duration),
    /// Wait before answering with the inner response
    Delayed(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// JSON body with the given status.
    pub fn json(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    /// SSE body, one `data:` line per payload.
    pub fn sse<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        MockResponse::Stream(
            payloads
                .into_iter()
                .map(|p| Bytes::from(format!("data: {}\n\n", p.as_ref())))
                .collect(),
        )
    }
}

/// Mock HTTP client for testing.
///
/// Cloning shares the scripted responses and the request log.
///
/// ```ignore
/// use genie::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response("http://localhost:4110/chat-bot/chat", MockResponse::json(200, "{}"));
/// client.set_response(
///     "http://localhost:4110/chat-bot/chat-stream/",
///     MockResponse::sse([r#"{"type":"stream_end"}"#]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for `url`; an exact match wins over a prefix match.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        // Longest prefix wins so more specific scripts shadow general ones
        if let Some((_, response)) = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
        {
            return Some(response.clone());
        }

        lock(&self.default_response).clone()
    }

    /// Resolve delays and return the final scripted response.
    async fn resolve(&self, url: &str) -> Result<MockResponse, HttpError> {
        let mut response = self
            .get_response(url)
            .ok_or_else(|| HttpError::Other(format!("No mock response for URL: {}", url)))?;
        loop {
            match response {
                MockResponse::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
                other => return Ok(other),
            }
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.resolve(url).await? {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
            _ => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
        }
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.resolve(url).await? {
            MockResponse::Stream(chunks) => Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok)))),
            MockResponse::StreamThenError(chunks, err) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::once(async move { Err(err) })),
            )),
            MockResponse::StreamThenStall(chunks) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::pending()),
            )),
            MockResponse::Paced(chunks, gap) => Ok(Box::pin(stream::iter(chunks).then(
                move |chunk| async move {
                    tokio::time::sleep(gap).await;
                    Ok::<_, HttpError>(chunk)
                },
            ))),
            MockResponse::Error(err) => Err(err),
            MockResponse::Success(response) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text_lossy(),
                })
            }
            MockResponse::Success(_) | MockResponse::Delayed(..) => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
        }
    }
}
