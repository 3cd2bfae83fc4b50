use crate::constants::files::{PRESET_EXTENSION, PRESET_FILE_MODE};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::fs_atomic::{atomic_write_text_file, atomic_write_with, path_exists};
use crate::utils::preset_codec::{self, Effort, PresetRecord};
use crate::utils::slug::slugify;
use crate::utils::tool_errors::preset_not_found_error;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Listing entry: everything but the prompt body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<Effort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs_required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs_optional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<String>,
}

impl PresetSummary {
    fn from_record(slug: &str, record: PresetRecord) -> Self {
        Self {
            name: slug.to_string(),
            display_name: record.name,
            description: record.description,
            model: record.model,
            effort: record.effort,
            inputs_required: record.inputs_required,
            inputs_optional: record.inputs_optional,
            outputs: record.outputs,
        }
    }
}

/// Directory of `<slug>.md` files. Every call goes to disk.
#[derive(Clone)]
pub struct PresetStore {
    logger: Logger,
    dir: PathBuf,
    bundled_dir: Option<PathBuf>,
}

fn preset_slug_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(PRESET_EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

impl PresetStore {
    pub fn new(logger: Logger, dir: PathBuf, bundled_dir: Option<PathBuf>) -> Self {
        Self {
            logger: logger.child("presets"),
            dir,
            bundled_dir,
        }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, PRESET_EXTENSION))
    }

    /// Copies bundled presets whose slug is not yet in the store. Failures
    /// are logged, never returned; returns the slugs that were copied.
    pub fn seed_bundled(&self) -> Vec<String> {
        match self.try_seed() {
            Ok(copied) => {
                if !copied.is_empty() {
                    self.logger.info(
                        "seeded bundled presets",
                        Some(&serde_json::json!({ "copied": copied })),
                    );
                }
                copied
            }
            Err(err) => {
                self.logger.warn(
                    "bundled preset seeding skipped",
                    Some(&serde_json::json!({ "error": err.message })),
                );
                Vec::new()
            }
        }
    }

    fn try_seed(&self) -> Result<Vec<String>, ToolError> {
        let bundled = self
            .bundled_dir
            .as_ref()
            .ok_or_else(|| ToolError::not_found("no bundled preset directory found"))?;
        let sources = sorted_entries(bundled).map_err(|err| {
            ToolError::io(format!("cannot read {}: {}", bundled.display(), err))
        })?;
        fs::create_dir_all(&self.dir)?;

        let mut copied = Vec::new();
        for source in sources {
            let Some(stem) = preset_slug_of(&source) else {
                continue;
            };
            let slug = slugify(&stem);
            let target = self.path_for(&slug);
            if path_exists(&target) {
                continue;
            }
            let outcome = fs::read(&source).and_then(|bytes| {
                atomic_write_with(&target, PRESET_FILE_MODE, |file| file.write_all(&bytes))
            });
            match outcome {
                Ok(()) => copied.push(slug),
                Err(err) => self.logger.warn(
                    "failed to seed preset",
                    Some(&serde_json::json!({
                        "source": source,
                        "error": err.to_string(),
                    })),
                ),
            }
        }
        Ok(copied)
    }

    /// Slugs of stored presets, sorted. A missing directory is an empty store.
    pub fn slugs(&self) -> Result<Vec<String>, ToolError> {
        let entries = match sorted_entries(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut slugs = Vec::new();
        for path in entries {
            let Some(stem) = preset_slug_of(&path) else {
                continue;
            };
            if slugify(&stem) != stem {
                self.logger.warn(
                    "ignoring preset file with a non-slug name",
                    Some(&serde_json::json!({ "path": path })),
                );
                continue;
            }
            slugs.push(stem);
        }
        Ok(slugs)
    }

    fn not_found(&self, slug: &str) -> ToolError {
        preset_not_found_error(slug, &self.slugs().unwrap_or_default())
    }

    /// Raw file text, as stored.
    pub fn read_raw(&self, name: &str) -> Result<(String, String), ToolError> {
        let slug = slugify(name);
        match fs::read_to_string(self.path_for(&slug)) {
            Ok(text) => Ok((slug, text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(self.not_found(&slug)),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(ToolError::invalid_params(
                format!("Preset '{}' is not valid UTF-8 text", slug),
            )),
            Err(err) => Err(ToolError::io(format!(
                "Failed to read preset '{}': {}",
                slug, err
            ))),
        }
    }

    pub fn read(&self, name: &str) -> Result<PresetRecord, ToolError> {
        let (slug, text) = self.read_raw(name)?;
        let mut record = preset_codec::parse(&text).map_err(|err| {
            ToolError::invalid_params(format!("Preset '{}' is malformed: {}", slug, err.message))
        })?;
        if record.name.is_empty() {
            record.name = slug;
        }
        Ok(record)
    }

    /// Atomically stores `text` under the slug of `name`; returns the slug.
    pub fn write(&self, name: &str, text: &str, overwrite: bool) -> Result<String, ToolError> {
        let slug = slugify(name);
        let target = self.path_for(&slug);
        if !overwrite && path_exists(&target) {
            return Err(ToolError::already_exists(format!(
                "Preset '{}' already exists",
                slug
            ))
            .with_hint("Pass overwrite=true to replace it."));
        }
        atomic_write_text_file(&target, text, PRESET_FILE_MODE)
        .map_err(|err| ToolError::io(format!("Failed to write preset '{}': {}", slug, err)))?;
        self.logger.debug(
            "preset written",
            Some(&serde_json::json!({ "slug": slug, "overwrite": overwrite })),
        );
        Ok(slug)
    }

    /// Metadata for every readable preset. Unreadable or malformed files are
    /// skipped with a warning.
    pub fn list(&self) -> Result<Vec<PresetSummary>, ToolError> {
        let mut items = Vec::new();
        for slug in self.slugs()? {
            match self.read(&slug) {
                Ok(record) => items.push(PresetSummary::from_record(&slug, record)),
                Err(err) => self.logger.warn(
                    "skipping unreadable preset",
                    Some(&serde_json::json!({ "slug": slug, "error": err.message })),
                ),
            }
        }
        Ok(items)
    }

    pub fn delete(&self, name: &str) -> Result<String, ToolError> {
        let slug = slugify(name);
        match fs::remove_file(self.path_for(&slug)) {
            Ok(()) => Ok(slug),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(self.not_found(&slug)),
            Err(err) => Err(ToolError::io(format!(
                "Failed to delete preset '{}': {}",
                slug, err
            ))),
        }
    }
}
