use crate::config::AgentDefaults;
use crate::errors::ToolError;
use crate::services::endpoint_guard::validate_endpoint;
use crate::utils::preset_codec::{Effort, PresetRecord};
use crate::utils::text::non_blank;

/// Arguments supplied with one tool call. Blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct AgentRequest {
    pub query: String,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    pub effort: Option<Effort>,
    pub base_url: Option<String>,
}

/// Effective parameters for exactly one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    pub system_prompt: String,
    pub query: String,
    pub model: String,
    pub effort: Option<Effort>,
    pub endpoint_url: String,
}

/// First present value in precedence order.
pub fn first_present<T>(layers: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    layers.into_iter().flatten().next()
}

/// Merges call arguments over preset fields over process defaults.
pub fn resolve(
    request: AgentRequest,
    preset: Option<&PresetRecord>,
    defaults: &AgentDefaults,
) -> Result<InvocationConfig, ToolError> {
    let system_prompt = first_present([
        request.system_prompt.filter(|p| !p.trim().is_empty()),
        preset
            .map(|p| p.system_prompt.clone())
            .filter(|p| !p.trim().is_empty()),
    ])
    .ok_or_else(|| ToolError::invalid_params("systemPrompt must be a non-empty string"))?;

    let model = first_present([
        non_blank(request.model.as_deref()),
        preset.and_then(|p| non_blank(p.model.as_deref())),
        non_blank(Some(defaults.model.as_str())),
    ])
    .ok_or_else(|| ToolError::invalid_params("no model configured; pass model or set AGENT_MODEL"))?;

    let effort = first_present([request.effort, preset.and_then(|p| p.effort), defaults.effort]);

    let requested_url = non_blank(request.base_url.as_deref())
        .unwrap_or_else(|| defaults.base_url.clone());
    let endpoint_url = validate_endpoint(
        &requested_url,
        defaults.allow_custom_base_url,
        &defaults.base_url,
    )?;

    Ok(InvocationConfig {
        system_prompt,
        query: request.query,
        model,
        effort,
        endpoint_url,
    })
}
