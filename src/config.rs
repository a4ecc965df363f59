//! Client configuration.
//!
//! Use the builder methods to customize, or [`GenieConfig::from_env`] to read
//! `GENIE_*` environment variables.
//!
//! ```ignore
//! use genie::config::{CorrelationScheme, GenieConfig};
//!
//! let config = GenieConfig::from_env()
//!     .with_base_url("https://api-dev.example.com")
//!     .with_correlation(CorrelationScheme::TaskScoped);
//! ```

use std::time::Duration;

use serde_json::Value;

use crate::state::CorrelationId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4110";
pub const DEFAULT_SITE_URL: &str = "https://edvoy.com";
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub const SUBMIT_PATH: &str = "/chat-bot/chat";
pub const STREAM_PATH: &str = "/chat-bot/chat-stream";

/// Which identifier addresses the stream of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationScheme {
    /// The session id is the stream address; the submit response is ignored
    #[default]
    SessionScoped,
    /// The submit response carries a per-turn `task_id`
    TaskScoped,
}

impl CorrelationScheme {
    /// Accepts `session`, `session-scoped`, `task`, `task-scoped` (any case).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "session" | "session-scoped" | "session_scoped" => Some(Self::SessionScoped),
            "task" | "task-scoped" | "task_scoped" => Some(Self::TaskScoped),
            _ => None,
        }
    }
}

/// Which frame ends a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalConvention {
    /// `ai_response_completed` ends the turn
    #[default]
    CompletedIsTerminal,
    /// `ai_response_completed` is followed by `final_summary` and/or `stream_end`
    SummaryFollows,
}

impl TerminalConvention {
    /// Accepts `completed` or `summary` (any case).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" | "ai_response_completed" => Some(Self::CompletedIsTerminal),
            "summary" | "final_summary" | "stream_end" => Some(Self::SummaryFollows),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenieConfig {
    /// Assistant backend base URL
    pub base_url: String,
    /// Public site used to derive source links
    pub site_url: String,
    pub correlation: CorrelationScheme,
    pub terminal: TerminalConvention,
    /// Budget for the submit request
    pub submit_timeout: Duration,
    /// Budget for opening the stream
    pub connect_timeout: Duration,
    /// Longest allowed silence between stream chunks
    pub idle_timeout: Duration,
    /// How long to keep reading after a turn is sealed
    pub drain_timeout: Duration,
    /// Context attached to submissions that do not bring their own
    pub metadata: Option<Value>,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            correlation: CorrelationScheme::default(),
            terminal: TerminalConvention::default(),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            metadata: None,
        }
    }
}

impl GenieConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    pub fn with_correlation(mut self, scheme: CorrelationScheme) -> Self {
        self.correlation = scheme;
        self
    }

    pub fn with_terminal(mut self, convention: TerminalConvention) -> Self {
        self.terminal = convention;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Read `GENIE_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Unparseable values are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("GENIE_BASE_URL") {
            config = config.with_base_url(url.trim());
        }
        if let Some(url) = get("GENIE_SITE_URL") {
            config.site_url = url.trim().to_string();
        }
        if let Some(raw) = get("GENIE_CORRELATION") {
            match CorrelationScheme::parse(&raw) {
                Some(scheme) => config.correlation = scheme,
                None => tracing::warn!(value = %raw, "ignoring invalid GENIE_CORRELATION"),
            }
        }
        if let Some(raw) = get("GENIE_TERMINAL") {
            match TerminalConvention::parse(&raw) {
                Some(convention) => config.terminal = convention,
                None => tracing::warn!(value = %raw, "ignoring invalid GENIE_TERMINAL"),
            }
        }
        if let Some(secs) = seconds(&get, "GENIE_SUBMIT_TIMEOUT_SECS") {
            config.submit_timeout = secs;
        }
        if let Some(secs) = seconds(&get, "GENIE_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = secs;
        }
        if let Some(secs) = seconds(&get, "GENIE_IDLE_TIMEOUT_SECS") {
            config.idle_timeout = secs;
        }
        if let Some(raw) = get("GENIE_METADATA") {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value @ Value::Object(_)) => config.metadata = Some(value),
                Ok(_) => tracing::warn!("ignoring GENIE_METADATA: not a JSON object"),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid GENIE_METADATA"),
            }
        }

        config
    }

    pub fn submit_url(&self) -> String {
        format!("{}{}", self.base_url, SUBMIT_PATH)
    }

    /// Stream URL with the correlation id encoded as one path segment.
    pub fn stream_url(&self, correlation_id: &CorrelationId) -> String {
        let base = format!("{}{}", self.base_url, STREAM_PATH);
        let id = correlation_id.to_string();
        match reqwest::Url::parse(&base) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.push(&id);
                }
                url.to_string()
            }
            // Unparseable base; the HTTP layer reports it as an invalid URL
            Err(_) => format!("{}/{}", base, id),
        }
    }
}

fn seconds<F>(get: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid timeout");
            None
        }
    }
}
