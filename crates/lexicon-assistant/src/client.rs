//! Completion client bound to a user's API key
//!
//! A client is either uninitialized (assistant disabled or no usable key) or
//! ready (key, model and HTTP client bound). Uninitialized clients never touch
//! the network, so callers may build one per render without checking first.

use lexicon_core::{
    AssistantSettings, CredentialStore, SecretString, UserProfile, DEFAULT_MODEL,
};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::CompletionError;
use crate::protocol::{
    ApiErrorResponse, ChatRequest, ChatResponse, CompletionResult, DEFAULT_ROLE,
};

/// Chat completion client
#[derive(Debug)]
pub struct CompletionClient {
    state: ClientState,
}

#[derive(Debug)]
enum ClientState {
    Uninitialized,
    Ready(ReadyState),
}

#[derive(Debug)]
struct ReadyState {
    http: Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

impl CompletionClient {
    /// A client that refuses every request
    pub fn uninitialized() -> Self {
        Self {
            state: ClientState::Uninitialized,
        }
    }

    /// Build a client from a profile snapshot.
    ///
    /// The client is ready only when the assistant is enabled and the stored
    /// key reveals to a non-empty string.
    pub fn from_profile(
        profile: &UserProfile,
        store: &CredentialStore,
        settings: &AssistantSettings,
    ) -> Self {
        if !profile.is_ai_assistant_enabled {
            debug!("Assistant disabled for profile");
            return Self::uninitialized();
        }

        match store.reveal(&profile.api_key) {
            Some(api_key) => Self::with_key(api_key, profile.model_id(), settings),
            None => {
                debug!(
                    credential = profile.api_key.kind(),
                    "No usable API key on profile"
                );
                Self::uninitialized()
            }
        }
    }

    /// Build a client from a profile, or `None` if it would not be ready
    pub fn initialize(
        profile: &UserProfile,
        store: &CredentialStore,
        settings: &AssistantSettings,
    ) -> Option<Self> {
        let client = Self::from_profile(profile, store, settings);
        client.is_ready().then_some(client)
    }

    /// Build a client from an already revealed key
    pub fn with_key(
        api_key: SecretString,
        model: Option<&str>,
        settings: &AssistantSettings,
    ) -> Self {
        if api_key.is_empty() {
            debug!("Empty API key, assistant unavailable");
            return Self::uninitialized();
        }

        let http = match Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
        {
            Ok(http) => http,
            Err(e) => {
                warn!(error = %e, "Failed to create HTTP client, assistant unavailable");
                return Self::uninitialized();
            }
        };

        let model = model
            .filter(|m| !m.is_empty())
            .or_else(|| Some(settings.default_model.as_str()).filter(|m| !m.is_empty()))
            .unwrap_or(DEFAULT_MODEL)
            .to_string();

        Self {
            state: ClientState::Ready(ReadyState {
                http,
                api_key,
                model,
                endpoint: settings.completions_url(),
            }),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ClientState::Ready(_))
    }

    /// Model bound to a ready client
    pub fn model(&self) -> Option<&str> {
        match &self.state {
            ClientState::Ready(ready) => Some(&ready.model),
            ClientState::Uninitialized => None,
        }
    }

    /// Send a single-message prompt and return the first choice.
    ///
    /// Returns [`CompletionError::NotReady`] without any I/O when the client
    /// is uninitialized or the prompt is empty.
    pub async fn get_completion(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        let ready = match &self.state {
            ClientState::Ready(ready) if !prompt.is_empty() => ready,
            _ => return Err(CompletionError::NotReady),
        };

        let request = ChatRequest::single_prompt(&ready.model, prompt);

        debug!(model = %ready.model, endpoint = %ready.endpoint, "Sending completion request");

        let started = Instant::now();
        let sent = ready
            .http
            .post(&ready.endpoint)
            .bearer_auth(ready.api_key.expose())
            .json(&request)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    elapsed_ms = elapsed_ms(started),
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    "Completion request could not reach the service"
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(status = status.as_u16(), "Failed to read completion response body");
            CompletionError::from(e)
        })?;
        let elapsed_time_ms = elapsed_ms(started);

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => (
                    api_err.error.code(),
                    api_err
                        .error
                        .message
                        .unwrap_or_else(|| status.to_string()),
                ),
                Err(_) if body.trim().is_empty() => (None, status.to_string()),
                Err(_) => (None, body),
            };

            warn!(
                status = status.as_u16(),
                code = code.as_deref().unwrap_or("-"),
                elapsed_ms = elapsed_time_ms,
                "Completion request rejected"
            );

            return Err(CompletionError::RemoteApi {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                status = status.as_u16(),
                raw_response = %body,
                "Completion response was not valid JSON"
            );
            CompletionError::RemoteApi {
                status: status.as_u16(),
                code: Some("malformed_response".to_string()),
                message: format!("invalid response body: {}", e),
            }
        })?;

        let message = parsed.first_message();
        let content = match message.and_then(|m| m.text()).filter(|c| !c.is_empty()) {
            Some(content) => content,
            None => {
                warn!(
                    elapsed_ms = elapsed_time_ms,
                    raw_response = %body,
                    "Completion response had no content"
                );
                return Err(CompletionError::EmptyResponse);
            }
        };

        let role = message
            .and_then(|m| m.role.clone())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        info!(
            model = %ready.model,
            status = status.as_u16(),
            elapsed_ms = elapsed_time_ms,
            usage = ?parsed.usage,
            "Completion request succeeded"
        );

        Ok(CompletionResult {
            content,
            role,
            usage: parsed.usage,
            elapsed_time_ms,
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
