use crate::errors::ToolError;
use crate::services::chat_client::{ChatCompletionRequest, ChatMessage, ChatTransport};
use crate::services::logger::Logger;
use crate::services::resolver::InvocationConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

impl From<&InvocationConfig> for ChatCompletionRequest {
    fn from(config: &InvocationConfig) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage::system(config.system_prompt.clone()),
                ChatMessage::user(config.query.clone()),
            ],
            stream: false,
            reasoning_effort: config.effort,
        }
    }
}

/// Issues one bounded, non-streaming completion per call. No retries.
#[derive(Clone)]
pub struct AgentInvoker {
    logger: Logger,
    transport: Arc<dyn ChatTransport>,
    timeout_ms: u64,
}

impl AgentInvoker {
    pub fn new(logger: Logger, transport: Arc<dyn ChatTransport>, timeout_ms: u64) -> Self {
        Self {
            logger: logger.child("invoker"),
            transport,
            timeout_ms,
        }
    }

    pub async fn invoke(&self, config: &InvocationConfig) -> Result<String, ToolError> {
        let request = ChatCompletionRequest::from(config);
        self.logger.info(
            "agent call",
            Some(&serde_json::json!({
                "endpoint": config.endpoint_url,
                "model": config.model,
                "effort": config.effort.map(|e| e.as_str()),
                "query_bytes": config.query.len(),
            })),
        );

        let started = Instant::now();
        // Dropping the in-flight future on expiry cancels the request.
        let outcome = tokio::time::timeout(
            Duration::from_millis(self.timeout_ms),
            self.transport.complete(&config.endpoint_url, &request),
        )
        .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Err(_) => {
                self.logger.warn(
                    "agent call timed out",
                    Some(&serde_json::json!({ "timeout_ms": self.timeout_ms })),
                );
                Err(ToolError::timeout(format!(
                    "Agent call timed out after {} ms",
                    self.timeout_ms
                ))
                .with_hint("Raise AGENT_TIMEOUT_MS or simplify the query."))
            }
            Ok(Err(err)) => {
                self.logger.warn(
                    "agent call failed",
                    Some(&serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "duration_ms": duration_ms,
                    })),
                );
                Err(err)
            }
            Ok(Ok(response)) => {
                let text = response.into_text();
                self.logger.debug(
                    "agent call finished",
                    Some(&serde_json::json!({
                        "duration_ms": duration_ms,
                        "response_bytes": text.len(),
                    })),
                );
                Ok(text)
            }
        }
    }
}
