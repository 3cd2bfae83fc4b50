use crate::config::AgentDefaults;
use crate::errors::ToolError;
use crate::services::invoker::AgentInvoker;
use crate::services::logger::Logger;
use crate::services::preset::PresetStore;
use crate::services::resolver::{resolve, AgentRequest};
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const AGENT_TOOLS: &[&str] = &["run_agent", "run_preset"];

#[derive(Clone)]
pub struct AgentManager {
    logger: Logger,
    validation: Validation,
    preset_store: Arc<PresetStore>,
    invoker: Arc<AgentInvoker>,
    defaults: AgentDefaults,
}

impl AgentManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        preset_store: Arc<PresetStore>,
        invoker: Arc<AgentInvoker>,
        defaults: AgentDefaults,
    ) -> Self {
        Self {
            logger: logger.child("agent"),
            validation,
            preset_store,
            invoker,
            defaults,
        }
    }

    fn request_from_args(&self, args: &Value) -> Result<AgentRequest, ToolError> {
        Ok(AgentRequest {
            query: self
                .validation
                .ensure_string(args.get("query"), "query", false)?,
            system_prompt: None,
            model: self
                .validation
                .ensure_optional_string(args.get("model"), "model")?,
            effort: self
                .validation
                .ensure_optional_effort(args.get("effort"), "effort")?,
            base_url: self
                .validation
                .ensure_optional_string(args.get("baseUrl"), "baseUrl")?,
        })
    }

    pub async fn run_agent(&self, args: &Value) -> Result<Value, ToolError> {
        let mut request = self.request_from_args(args)?;
        request.system_prompt = Some(self.validation.ensure_string(
            args.get("systemPrompt"),
            "systemPrompt",
            false,
        )?);
        let config = resolve(request, None, &self.defaults)?;
        let text = self.invoker.invoke(&config).await?;
        Ok(Value::String(text))
    }

    pub async fn run_preset(&self, args: &Value) -> Result<Value, ToolError> {
        let preset_name = self
            .validation
            .ensure_string(args.get("presetName"), "presetName", true)?;
        let request = self.request_from_args(args)?;
        let preset = self.preset_store.read(&preset_name)?;
        self.logger.debug(
            "running preset",
            Some(&serde_json::json!({ "preset": preset_name })),
        );
        let config = resolve(request, Some(&preset), &self.defaults)?;
        let text = self.invoker.invoke(&config).await?;
        Ok(Value::String(text))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for AgentManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "run_agent" => self.run_agent(&args).await,
            "run_preset" => self.run_preset(&args).await,
            _ => Err(unknown_tool_error("agent", tool, AGENT_TOOLS)),
        }
    }
}
