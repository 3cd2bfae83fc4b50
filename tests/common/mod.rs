#![allow(dead_code)]

use agentkit::config::Config;
use agentkit::errors::ToolError;
use agentkit::services::chat_client::{ChatCompletionRequest, ChatCompletionResponse, ChatTransport};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn tmp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
}

/// Config built from an explicit key map; the process environment is untouched.
pub fn config_with(presets_dir: &Path, pairs: &[(&str, &str)]) -> Config {
    let mut map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    map.insert(
        "AGENT_PRESETS_DIR".to_string(),
        presets_dir.display().to_string(),
    );
    map.entry("AGENT_BUNDLED_PRESETS_DIR".to_string())
        .or_insert_with(|| presets_dir.join("no-bundled").display().to_string());
    map.entry("LOG_LEVEL".to_string())
        .or_insert_with(|| "error".to_string());
    Config::from_lookup(move |key: &str| map.get(key).cloned())
}

pub fn completion_body(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub enum FakeReply {
    Text(String),
    Fail(ToolError),
    Hang,
}

/// In-memory transport recording every request it receives.
pub struct FakeTransport {
    reply: FakeReply,
    calls: StdMutex<Vec<(String, ChatCompletionRequest)>>,
}

impl FakeTransport {
    pub fn replying(text: &str) -> Self {
        Self::with(FakeReply::Text(text.to_string()))
    }

    pub fn with(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ChatCompletionRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ChatCompletionRequest {
        self.calls().last().expect("at least one call").1.clone()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn complete(
        &self,
        endpoint_url: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint_url.to_string(), request.clone()));
        match &self.reply {
            FakeReply::Text(text) => Ok(serde_json::from_str(&completion_body(text)).unwrap()),
            FakeReply::Fail(err) => Err(err.clone()),
            FakeReply::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
