//! Scripted HTTP fixtures.

pub use genie::adapters::mock::{MockHttpClient, MockResponse, RecordingRenderer};

use genie::client::GenieClient;
use genie::config::GenieConfig;

pub const SUBMIT_URL: &str = "http://localhost:4110/chat-bot/chat";
pub const STREAM_PREFIX: &str = "http://localhost:4110/chat-bot/chat-stream/";

/// Client over a mock whose submit endpoint accepts everything.
pub fn scripted_client(config: GenieConfig) -> (GenieClient<MockHttpClient>, MockHttpClient) {
    let http = MockHttpClient::new();
    http.set_response(SUBMIT_URL, MockResponse::json(200, "{}"));
    (GenieClient::new(config, http.clone()), http)
}
