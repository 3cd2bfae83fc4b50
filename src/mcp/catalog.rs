use crate::errors::ToolError;
use crate::utils::suggest::suggest;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{JSONSchema, ValidationError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_CATALOG.iter().find(|tool| tool.name == name)
}

pub fn tool_names() -> Vec<String> {
    TOOL_CATALOG.iter().map(|tool| tool.name.clone()).collect()
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let (Some(tool), Some(schema)) = (tool_by_name(tool_name), TOOL_VALIDATORS.get(tool_name))
    else {
        return Ok(());
    };
    let Err(errors) = schema.validate(args) else {
        return Ok(());
    };
    let known_fields: Vec<String> = tool
        .input_schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    let mut problems = Vec::new();
    let mut hints = Vec::new();
    for err in errors.take(MAX_REPORTED_ERRORS) {
        describe(&err, &known_fields, &mut problems, &mut hints);
    }

    let mut message = format!("Invalid arguments for {}", tool_name);
    for problem in &problems {
        message.push_str("\n- ");
        message.push_str(problem);
    }
    if !hints.is_empty() {
        message.push_str(&format!("\nDid you mean: {}", hints.join(" | ")));
    }
    Err(ToolError::invalid_params(message))
}

const MAX_REPORTED_ERRORS: usize = 10;

fn describe(
    err: &ValidationError<'_>,
    known_fields: &[String],
    problems: &mut Vec<String>,
    hints: &mut Vec<String>,
) {
    let pointer = err.instance_path.to_string();
    let at = if pointer.is_empty() {
        "(root)".to_string()
    } else {
        pointer.clone()
    };
    match &err.kind {
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            for field in unexpected {
                problems.push(format!("{}: unknown field '{}'", at, field));
                let close = suggest(field, known_fields, 3);
                if !close.is_empty() {
                    hints.push(format!("field '{}': {}", field, close.join(", ")));
                }
            }
        }
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            problems.push(format!("{}: missing required field '{}'", at, field));
        }
        ValidationErrorKind::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(primitive) => primitive.to_string(),
                TypeKind::Multiple(types) => (*types)
                    .into_iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" | "),
            };
            problems.push(format!("{}: expected {}", at, expected));
        }
        _ => problems.push(format!("{}: {}", at, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_lists_the_five_tools() {
        let names = tool_names();
        assert_eq!(
            names,
            vec![
                "run_agent",
                "run_preset",
                "save_preset",
                "list_presets",
                "delete_preset"
            ]
        );
        assert_eq!(TOOL_VALIDATORS.len(), names.len());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = validate_tool_args("run_agent", &json!({"query": "hi"})).unwrap_err();
        assert!(err.message.contains("missing required field 'systemPrompt'"));
    }

    #[test]
    fn unknown_field_gets_a_suggestion() {
        let err = validate_tool_args(
            "run_preset",
            &json!({"query": "hi", "presetName": "oracle", "presetname": "x"}),
        )
        .unwrap_err();
        assert!(err.message.contains("unknown field 'presetname'"));
        assert!(err.message.contains("Did you mean: field 'presetname': presetName"));
    }

    #[test]
    fn effort_case_is_left_to_the_handler() {
        assert!(validate_tool_args(
            "run_agent",
            &json!({"query": "q", "systemPrompt": "s", "effort": "HIGH"})
        )
        .is_ok());
        assert!(validate_tool_args(
            "save_preset",
            &json!({"name": "oracle", "systemPrompt": "s", "effort": " XHigh "})
        )
        .is_ok());
        let err = validate_tool_args(
            "run_preset",
            &json!({"query": "q", "presetName": "oracle", "effort": 3}),
        )
        .unwrap_err();
        assert!(err.message.contains("/effort: expected string"), "{}", err.message);
    }

    #[test]
    fn valid_args_pass() {
        assert!(validate_tool_args("list_presets", &json!({})).is_ok());
        assert!(validate_tool_args(
            "save_preset",
            &json!({"name": "oracle", "systemPrompt": "Think.", "overwrite": true})
        )
        .is_ok());
    }
}
