use crate::errors::{ToolError, ToolErrorKind};
use crate::services::logger::Logger;
use crate::services::preset::PresetStore;
use crate::services::validation::Validation;
use crate::utils::preset_codec::{render, PresetRecord};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const PRESET_TOOLS: &[&str] = &["save_preset", "list_presets", "delete_preset"];

#[derive(Clone)]
pub struct PresetManager {
    logger: Logger,
    validation: Validation,
    preset_store: Arc<PresetStore>,
}

impl PresetManager {
    pub fn new(logger: Logger, validation: Validation, preset_store: Arc<PresetStore>) -> Self {
        Self {
            logger: logger.child("preset"),
            validation,
            preset_store,
        }
    }

    pub fn save_preset(&self, args: &Value) -> Result<Value, ToolError> {
        let optional = |key: &str| self.validation.ensure_optional_string(args.get(key), key);
        let record = PresetRecord {
            name: self.validation.ensure_string(args.get("name"), "name", true)?,
            description: optional("description")?,
            model: optional("model")?,
            effort: self
                .validation
                .ensure_optional_effort(args.get("effort"), "effort")?,
            inputs_required: optional("inputsRequired")?,
            inputs_optional: optional("inputsOptional")?,
            outputs: optional("outputs")?,
            system_prompt: self
                .validation
                .ensure_string(args.get("systemPrompt"), "systemPrompt", true)?,
        };
        let overwrite = self
            .validation
            .ensure_optional_bool(args.get("overwrite"), "overwrite")?;
        let slug = self
            .preset_store
            .write(&record.name, &render(&record), overwrite)?;
        self.logger.info(
            "preset saved",
            Some(&serde_json::json!({ "slug": slug, "overwrite": overwrite })),
        );
        Ok(Value::String(format!(
            "Saved preset '{}' ({}).",
            record.name,
            self.preset_store.path_for(&slug).display()
        )))
    }

    pub fn list_presets(&self) -> Result<Value, ToolError> {
        let presets = self.preset_store.list()?;
        Ok(serde_json::json!({ "presets": presets }))
    }

    pub fn delete_preset(&self, args: &Value) -> Result<Value, ToolError> {
        let name = self.validation.ensure_string(args.get("name"), "name", true)?;
        let slug = self.preset_store.delete(&name)?;
        self.logger
            .info("preset deleted", Some(&serde_json::json!({ "slug": slug })));
        Ok(Value::String(format!("Deleted preset '{}'.", slug)))
    }

    /// Body for `preset://<name>`: the stored file verbatim, or a not-found note.
    pub fn read_resource(&self, name: &str) -> String {
        match self.preset_store.read_raw(name) {
            Ok((_, text)) => text,
            Err(err) if err.kind == ToolErrorKind::NotFound => {
                format!("Preset '{}' not found.", crate::utils::slug::slugify(name))
            }
            Err(err) => err.to_content_text(),
        }
    }

    pub fn resource_slugs(&self) -> Result<Vec<String>, ToolError> {
        self.preset_store.slugs()
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for PresetManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "save_preset" => self.save_preset(&args),
            "list_presets" => self.list_presets(),
            "delete_preset" => self.delete_preset(&args),
            _ => Err(unknown_tool_error("preset", tool, PRESET_TOOLS)),
        }
    }
}
