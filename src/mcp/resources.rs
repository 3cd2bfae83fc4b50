use crate::errors::{ErrorCode, McpError};
use crate::managers::preset::PresetManager;
use serde_json::Value;

pub const PRESET_URI_SCHEME: &str = "preset://";
const MIME_TYPE: &str = "text/markdown";

pub fn preset_uri(slug: &str) -> String {
    format!("{}{}", PRESET_URI_SCHEME, slug)
}

/// Name segment of a `preset://<name>` URI.
pub fn preset_name_from_uri(uri: &str) -> Option<&str> {
    let name = uri.trim().strip_prefix(PRESET_URI_SCHEME)?.trim_matches('/');
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn resource_templates() -> Value {
    serde_json::json!({
        "resourceTemplates": [{
            "uriTemplate": format!("{}{{name}}", PRESET_URI_SCHEME),
            "name": "preset",
            "description": "Raw preset file: header plus system prompt.",
            "mimeType": MIME_TYPE,
        }]
    })
}

pub fn list_resources(presets: &PresetManager) -> Result<Value, McpError> {
    let slugs = presets
        .resource_slugs()
        .map_err(|err| McpError::new(ErrorCode::InternalError, err.message))?;
    let resources: Vec<Value> = slugs
        .iter()
        .map(|slug| {
            serde_json::json!({
                "uri": preset_uri(slug),
                "name": slug,
                "mimeType": MIME_TYPE,
            })
        })
        .collect();
    Ok(serde_json::json!({ "resources": resources }))
}

pub fn read_resource(presets: &PresetManager, uri: &str) -> Result<Value, McpError> {
    let name = preset_name_from_uri(uri).ok_or_else(|| {
        McpError::invalid_params(format!(
            "Unsupported resource URI '{}'; expected preset://<name>",
            uri
        ))
    })?;
    Ok(serde_json::json!({
        "contents": [{
            "uri": uri,
            "mimeType": MIME_TYPE,
            "text": presets.read_resource(name),
        }]
    }))
}
