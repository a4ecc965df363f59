//! Turn driver: submits a message, then consumes its stream.
//!
//! A turn is two requests. The submit call posts the user's message and
//! yields the correlation id; the stream call opens
//! `/chat-bot/chat-stream/{id}` and feeds every decoded frame into the
//! conversation state until a terminal event, end of stream, or a failure.
//! Whatever happens after the submit succeeds, exactly one assistant message
//! is appended to history.
//!
//! ```ignore
//! use genie::adapters::ReqwestHttpClient;
//! use genie::client::GenieClient;
//! use genie::config::GenieConfig;
//! use genie::traits::NullRenderer;
//!
//! let mut client = GenieClient::new(GenieConfig::from_env(), ReqwestHttpClient::new());
//! let report = client.send("Masters in data science in the UK", &mut NullRenderer).await?;
//! println!("{}", report.message.text());
//! ```

use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;

use crate::config::{CorrelationScheme, GenieConfig};
use crate::error::{GenieResult, StateError, TransportError};
use crate::models::{ChatRequest, Message, Outcome, SubmitAccepted, Suggestion};
use crate::sse::{frames, Frame, FrameStream};
use crate::state::{ConversationState, CorrelationId, SessionId, Step};
use crate::traits::{Headers, HttpClient, HttpError, Renderer};

/// What a finished turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The sealed assistant message, already in history
    pub message: Message,
    /// Frames skipped because they could not be decoded
    pub malformed_frames: usize,
    /// Events that arrived after the turn was sealed
    pub discarded_frames: usize,
    /// Set when the stream failed or timed out
    pub transport_error: Option<TransportError>,
}

impl TurnReport {
    pub fn outcome(&self) -> Option<&Outcome> {
        self.message.as_genie().map(|m| m.outcome())
    }
}

/// One conversation with the assistant backend.
pub struct GenieClient<C: HttpClient> {
    config: GenieConfig,
    http: C,
    state: ConversationState,
}

impl<C: HttpClient> GenieClient<C> {
    pub fn new(config: GenieConfig, http: C) -> Self {
        let state = ConversationState::with_config(&config);
        tracing::info!(
            session_id = %state.session(),
            base_url = %config.base_url,
            correlation = ?config.correlation,
            terminal = ?config.terminal,
            "genie client ready"
        );
        Self {
            config,
            http,
            state,
        }
    }

    pub fn config(&self) -> &GenieConfig {
        &self.config
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn session(&self) -> &SessionId {
        self.state.session()
    }

    pub fn history(&self) -> &[Message] {
        self.state.history().messages()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Start over with a new session and an empty history.
    pub fn reset(&mut self) -> &SessionId {
        self.state.start_conversation()
    }

    /// Submit `text` and stream the answer.
    pub async fn send(&mut self, text: &str, renderer: &mut dyn Renderer) -> GenieResult<TurnReport> {
        self.send_with(text, None, None, renderer).await
    }

    /// Submit the prompt of a suggestion along with its action key.
    pub async fn send_suggestion(
        &mut self,
        suggestion: &Suggestion,
        renderer: &mut dyn Renderer,
    ) -> GenieResult<TurnReport> {
        self.send_with(
            &suggestion.prompt,
            None,
            suggestion.action_key.clone(),
            renderer,
        )
        .await
    }

    /// Submit with explicit metadata and action key, then stream the answer.
    ///
    /// `metadata` falls back to the configured default when `None`.
    pub async fn send_with(
        &mut self,
        text: &str,
        metadata: Option<Value>,
        action_key: Option<String>,
        renderer: &mut dyn Renderer,
    ) -> GenieResult<TurnReport> {
        self.submit(text, metadata, action_key).await?;
        self.consume_stream(renderer).await
    }

    /// Post the user's message and mark the turn pending.
    ///
    /// On failure the staged user message is removed from history and no
    /// turn begins.
    pub async fn submit(
        &mut self,
        text: &str,
        metadata: Option<Value>,
        action_key: Option<String>,
    ) -> GenieResult<CorrelationId> {
        let metadata = metadata.or_else(|| self.config.metadata.clone());
        let request = self.state.stage_user_message(text, action_key, metadata)?;

        let correlation_id = match self.dispatch(&request).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(
                    session_id = %request.session_id,
                    code = err.error_code(),
                    error = %err,
                    "submit failed"
                );
                self.state.rollback_user_message();
                return Err(err.into());
            }
        };

        if let Err(err) = self.state.begin_turn(correlation_id.clone()) {
            self.state.rollback_user_message();
            return Err(err.into());
        }
        tracing::info!(
            session_id = %request.session_id,
            correlation_id = %correlation_id,
            "turn started"
        );
        Ok(correlation_id)
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<CorrelationId, TransportError> {
        let url = self.config.submit_url();
        let body = serde_json::to_string(request).map_err(|e| TransportError::Other {
            message: format!("could not encode request: {}", e),
        })?;
        tracing::debug!(url = %url, action_key = ?request.action_key, "submitting message");

        let limit = self.config.submit_timeout;
        let response = tokio::time::timeout(limit, self.http.post_json(&url, &body, &Headers::new()))
            .await
            .map_err(|_| TransportError::timeout("submit", limit))?
            .map_err(|e| TransportError::from_http(e, &url))?;

        if !response.is_success() {
            return Err(TransportError::HttpStatus {
                status: response.status,
                message: response.text_lossy(),
            });
        }

        match self.config.correlation {
            CorrelationScheme::SessionScoped => {
                Ok(CorrelationId::Session(self.state.session().clone()))
            }
            CorrelationScheme::TaskScoped => {
                let accepted = SubmitAccepted::from_body(&response.body).map_err(|e| {
                    TransportError::InvalidResponse {
                        message: format!("submit response is not JSON: {}", e),
                    }
                })?;
                accepted
                    .task_id()
                    .map(|id| CorrelationId::Task(id.to_string()))
                    .ok_or_else(|| TransportError::InvalidResponse {
                        message: "submit response carries no task_id".to_string(),
                    })
            }
        }
    }

    /// Read the pending turn's stream until it is sealed.
    ///
    /// Stream-phase transport failures do not surface as `Err`: the turn is
    /// sealed with an aborted message and the failure is kept in the report.
    pub async fn consume_stream(&mut self, renderer: &mut dyn Renderer) -> GenieResult<TurnReport> {
        let correlation_id = self
            .state
            .correlation()
            .active()
            .cloned()
            .ok_or(StateError::NoActiveTurn)?;
        let url = self.config.stream_url(&correlation_id);

        let connect = self.config.connect_timeout;
        let body = match tokio::time::timeout(connect, self.http.get_stream(&url, &Headers::new())).await {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => {
                return self.abort(TransportError::from_http(err, &url), 0, renderer);
            }
            Err(_) => {
                return self.abort(TransportError::timeout("stream connect", connect), 0, renderer);
            }
        };
        tracing::debug!(url = %url, "stream opened");

        let idle = self.config.idle_timeout;
        let mut stream = frames(body, idle);
        let mut malformed = 0;

        loop {
            match stream.next().await {
                None => {
                    tracing::warn!(
                        correlation_id = %correlation_id,
                        "stream ended without a terminal event"
                    );
                    break;
                }
                Some(Err(HttpError::Timeout(_))) => {
                    return self.abort(TransportError::timeout("stream", idle), malformed, renderer);
                }
                Some(Err(err)) => {
                    return self.abort(TransportError::from_http(err, &url), malformed, renderer);
                }
                Some(Ok(Frame::Malformed(err))) => {
                    malformed += 1;
                    tracing::warn!(code = err.error_code(), error = %err, "skipping malformed frame");
                }
                Some(Ok(Frame::Event(event))) => {
                    tracing::debug!(kind = event.type_name(), "frame received");
                    match self.state.apply(&event)? {
                        Step::Applied => {
                            if let Some(draft) = self.state.draft() {
                                renderer.draft_updated(draft);
                            }
                        }
                        Step::Ignored => {
                            tracing::debug!(kind = event.type_name(), "frame ignored");
                        }
                        Step::Terminal(outcome) => {
                            if let Some(draft) = self.state.draft() {
                                renderer.draft_updated(draft);
                            }
                            tracing::debug!(outcome = ?outcome, "terminal event");
                            let message = self.seal(renderer)?;
                            let discarded = drain(stream, self.config.drain_timeout).await;
                            return Ok(TurnReport {
                                message,
                                malformed_frames: malformed,
                                discarded_frames: discarded,
                                transport_error: None,
                            });
                        }
                    }
                }
            }
        }

        let message = self.seal(renderer)?;
        Ok(TurnReport {
            message,
            malformed_frames: malformed,
            discarded_frames: 0,
            transport_error: None,
        })
    }

    fn seal(&mut self, renderer: &mut dyn Renderer) -> GenieResult<Message> {
        let message = self.state.seal_turn()?;
        log_sealed(&message);
        renderer.turn_sealed(&message);
        Ok(message)
    }

    fn abort(
        &mut self,
        err: TransportError,
        malformed: usize,
        renderer: &mut dyn Renderer,
    ) -> GenieResult<TurnReport> {
        tracing::warn!(code = err.error_code(), error = %err, "stream failed, sealing partial answer");
        let message = self.state.abort_turn(&err.to_string())?;
        log_sealed(&message);
        renderer.turn_sealed(&message);
        Ok(TurnReport {
            message,
            malformed_frames: malformed,
            discarded_frames: 0,
            transport_error: Some(err),
        })
    }
}

fn log_sealed(message: &Message) {
    if let Some(genie) = message.as_genie() {
        tracing::info!(
            outcome = ?genie.outcome(),
            text_len = genie.text().len(),
            sources = genie.sources().len(),
            suggestions = genie.suggestions().len(),
            "turn sealed"
        );
    }
}

/// Read and discard what is left of a sealed turn's stream.
async fn drain(mut stream: FrameStream, limit: Duration) -> usize {
    let mut discarded = 0;
    let finished = tokio::time::timeout(limit, async {
        while let Some(item) = stream.next().await {
            if let Ok(Frame::Event(_)) = item {
                discarded += 1;
            }
        }
    })
    .await;
    if finished.is_err() {
        tracing::debug!("stream still open after drain timeout, dropping it");
    }
    if discarded > 0 {
        tracing::debug!(discarded, "discarded frames after seal");
    }
    discarded
}
