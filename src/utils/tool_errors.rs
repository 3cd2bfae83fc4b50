use crate::errors::ToolError;
use crate::utils::suggest::suggest;

pub fn unknown_tool_error(group: &str, tool: &str, known_tools: &[&str]) -> ToolError {
    let known: Vec<String> = known_tools.iter().map(|s| s.to_string()).collect();
    let suggestions = if !tool.is_empty() {
        suggest(tool, &known, 3)
    } else {
        Vec::new()
    };
    let mut hint = format!("Use one of: {}.", known.join(", "));
    if !suggestions.is_empty() {
        hint = format!("Did you mean: {}? {}", suggestions.join(", "), hint);
    }
    ToolError::internal(format!("Unknown {} tool: {}", group, tool))
        .with_hint(hint)
        .with_details(serde_json::json!({
            "known_tools": known,
            "did_you_mean": suggestions,
        }))
}

/// NotFound for a preset lookup, listing what exists so the caller can retry.
pub fn preset_not_found_error(slug: &str, available: &[String]) -> ToolError {
    let listing = if available.is_empty() {
        "No presets exist yet.".to_string()
    } else {
        format!("Available presets: {}.", available.join(", "))
    };
    let mut err =
        ToolError::not_found(format!("Preset '{}' not found. {}", slug, listing)).with_details(
            serde_json::json!({ "available": available }),
        );
    let suggestions = suggest(slug, available, 3);
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    err
}
