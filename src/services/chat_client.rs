use crate::constants::limits::{MAX_CACHED_CLIENTS, UPSTREAM_ERROR_EXCERPT_BYTES};
use crate::constants::network::{CHAT_COMPLETIONS_PATH, POOL_IDLE_TIMEOUT_MS};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::preset_codec::Effort;
use crate::utils::text::truncate_utf8_prefix;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<Effort>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// First choice's content; an empty answer is still an answer.
    pub fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(
        &self,
        endpoint_url: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ToolError>;
}

pub fn completions_url(endpoint_url: &str) -> String {
    format!(
        "{}/{}",
        endpoint_url.trim().trim_end_matches('/'),
        CHAT_COMPLETIONS_PATH
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::timeout("Agent call timed out");
    }
    ToolError::upstream(format!("Completion request failed: {}", err))
}

/// OpenAI-compatible transport keeping one pooled client per endpoint.
///
/// At most `max_clients` endpoints are cached; past that an arbitrary entry
/// is evicted. Redirects are never followed, so a request cannot leave the
/// endpoint that passed the guard.
#[derive(Clone)]
pub struct HttpChatTransport {
    logger: Logger,
    api_key: Option<String>,
    clients: Arc<DashMap<String, Client>>,
    max_clients: usize,
}

impl HttpChatTransport {
    pub fn new(logger: Logger, api_key: Option<String>) -> Self {
        Self::with_client_limit(logger, api_key, MAX_CACHED_CLIENTS)
    }

    pub fn with_client_limit(logger: Logger, api_key: Option<String>, max_clients: usize) -> Self {
        Self {
            logger: logger.child("http"),
            api_key,
            clients: Arc::new(DashMap::new()),
            max_clients: max_clients.max(1),
        }
    }

    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    fn evict_one(&self) {
        // Key is cloned first: removing while an iterator guard is alive deadlocks.
        let victim = self.clients.iter().next().map(|entry| entry.key().clone());
        if let Some(key) = victim {
            self.clients.remove(&key);
            self.logger.debug(
                "evicted client",
                Some(&serde_json::json!({ "endpoint": key })),
            );
        }
    }

    fn client_for(&self, endpoint_url: &str) -> Result<Client, ToolError> {
        if let Some(existing) = self.clients.get(endpoint_url) {
            return Ok(existing.value().clone());
        }
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .pool_idle_timeout(Duration::from_millis(POOL_IDLE_TIMEOUT_MS))
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        while self.clients.len() >= self.max_clients {
            self.evict_one();
        }
        self.logger.debug(
            "created client",
            Some(&serde_json::json!({ "endpoint": endpoint_url })),
        );
        Ok(self
            .clients
            .entry(endpoint_url.to_string())
            .or_insert(client)
            .value()
            .clone())
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn complete(
        &self,
        endpoint_url: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ToolError> {
        let client = self.client_for(endpoint_url)?;
        let mut builder = client.post(completions_url(endpoint_url)).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ToolError::upstream(format!(
                "Completion endpoint returned HTTP {}: {}",
                status.as_u16(),
                truncate_utf8_prefix(body.trim(), UPSTREAM_ERROR_EXCERPT_BYTES)
            ))
            .with_details(serde_json::json!({ "status": status.as_u16() })));
        }
        serde_json::from_str(&body).map_err(|err| {
            ToolError::upstream(format!("Malformed completion response: {}", err))
        })
    }
}
