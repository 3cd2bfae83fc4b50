use crate::config::Config;
use crate::errors::ToolError;
use crate::managers::agent::{AgentManager, AGENT_TOOLS};
use crate::managers::preset::{PresetManager, PRESET_TOOLS};
use crate::mcp::catalog::tool_catalog;
use crate::services::chat_client::{ChatTransport, HttpChatTransport};
use crate::services::invoker::AgentInvoker;
use crate::services::logger::Logger;
use crate::services::preset::PresetStore;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: Config,
    pub preset_store: Arc<PresetStore>,
    pub preset_manager: Arc<PresetManager>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    /// Production wiring: HTTP transport with the configured API key.
    pub fn initialize(config: Config) -> Result<Self, ToolError> {
        let logger = Logger::new("agentkit", config.log_level);
        let transport: Arc<dyn ChatTransport> =
            Arc::new(HttpChatTransport::new(logger.clone(), config.api_key.clone()));
        Self::build(logger, config, transport)
    }

    pub fn with_transport(
        config: Config,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<Self, ToolError> {
        let logger = Logger::new("agentkit", config.log_level);
        Self::build(logger, config, transport)
    }

    fn build(
        logger: Logger,
        config: Config,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<Self, ToolError> {
        let validation = Validation::new();
        let preset_store = Arc::new(PresetStore::new(
            logger.clone(),
            config.presets_dir.clone(),
            config.bundled_presets_dir.clone(),
        ));
        let invoker = Arc::new(AgentInvoker::new(
            logger.clone(),
            transport,
            config.timeout_ms,
        ));

        let agent_manager: Arc<dyn ToolHandler> = Arc::new(AgentManager::new(
            logger.clone(),
            validation.clone(),
            preset_store.clone(),
            invoker,
            config.defaults.clone(),
        ));
        let preset_manager = Arc::new(PresetManager::new(
            logger.clone(),
            validation,
            preset_store.clone(),
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for tool in AGENT_TOOLS {
            handlers.insert(tool.to_string(), agent_manager.clone());
        }
        let preset_handler: Arc<dyn ToolHandler> = preset_manager.clone();
        for tool in PRESET_TOOLS {
            handlers.insert(tool.to_string(), preset_handler.clone());
        }
        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            config,
            preset_store,
            preset_manager,
            tool_executor,
        })
    }

    /// Startup chores: report effective config, then seed bundled presets.
    pub fn seed_bundled_presets(&self) -> Vec<String> {
        self.logger.info("starting", Some(&self.config.summary()));
        if let Some(raw) = &self.config.ignored_effort {
            self.logger.warn(
                "ignoring unrecognised AGENT_EFFORT",
                Some(&serde_json::json!({ "value": raw })),
            );
        }
        self.preset_store.seed_bundled()
    }
}
