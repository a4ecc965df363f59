//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`]. Timeouts are applied by the
//! caller, so the inner `reqwest::Client` is built without one; a client-wide
//! timeout would also cut off long-lived streams.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::error::classify_reqwest_error;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// HTTP client implementation using reqwest.
///
/// ```ignore
/// use genie::adapters::ReqwestHttpClient;
/// use genie::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let body = client
///     .get_stream("http://localhost:4110/chat-bot/chat-stream/abc", &Headers::new())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a preconfigured `reqwest::Client` (proxies, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let builder = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        let builder = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream");
        let builder = Self::apply_headers(builder, headers);

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| match classify_reqwest_error(&e) {
                HttpError::Timeout(message) => HttpError::Timeout(message),
                other => HttpError::Body(other.to_string()),
            })
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_http_client_with_custom_client() {
        let custom = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let client = ReqwestHttpClient::with_client(custom);
        let _ = client.inner();
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "text/event-stream".parse().unwrap(),
        );
        header_map.insert(reqwest::header::CACHE_CONTROL, "no-cache".parse().unwrap());

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"text/event-stream".to_string())
        );
        assert_eq!(headers.get("cache-control"), Some(&"no-cache".to_string()));
    }

    #[tokio::test]
    async fn test_post_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client
            .post_json("not-a-valid-url", "{}", &Headers::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_connection_refused() {
        let client = ReqwestHttpClient::new();
        // Use a port that's unlikely to be in use
        let result = client
            .post_json("http://127.0.0.1:59999/chat-bot/chat", "{}", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_get_stream_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .get_stream("http://127.0.0.1:59999/chat-bot/chat-stream/s", &Headers::new())
            .await;
        assert!(result.is_err());
    }
}
