use crate::errors::ToolError;
use crate::utils::preset_codec::Effort;
use crate::utils::suggest::suggest;
use crate::utils::text::non_blank;
use serde_json::Value;

#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: Option<&Value>,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.and_then(|v| v.as_str()).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    /// Absent, null and blank all mean "not provided".
    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(non_blank(Some(text.as_str()))),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a string",
                label
            ))),
        }
    }

    pub fn ensure_optional_effort(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<Effort>, ToolError> {
        let Some(raw) = self.ensure_optional_string(value, label)? else {
            return Ok(None);
        };
        if let Some(effort) = Effort::parse(&raw) {
            return Ok(Some(effort));
        }
        let allowed: Vec<String> = Effort::ALL.iter().map(|e| e.as_str().to_string()).collect();
        let err = ToolError::invalid_params(format!(
            "{} must be one of: {} (got '{}')",
            label,
            allowed.join(", "),
            raw
        ));
        let close = suggest(&raw, &allowed, 1);
        Err(match close.first() {
            Some(candidate) => err.with_hint(format!("Did you mean: {}?", candidate)),
            None => err,
        })
    }

    pub fn ensure_optional_bool(&self, value: Option<&Value>, label: &str) -> Result<bool, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a boolean",
                label
            ))),
        }
    }
}
