//! Preset file format.
//!
//! ```text
//! ---
//! description: Answers hard questions
//! model: gpt-5
//! effort: high
//! ---
//!
//! # Oracle
//!
//! You are a careful expert...
//! ```
//!
//! The header is optional. Without one, a `> quoted` line directly under the
//! heading is read as the description.

use crate::errors::ToolError;
use serde::{Deserialize, Serialize};
use std::fmt;

const HEADER_DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
    #[serde(rename = "xhigh")]
    XHigh,
}

impl Effort {
    pub const ALL: [Effort; 4] = [Effort::Low, Effort::Medium, Effort::High, Effort::XHigh];

    pub fn as_str(self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
            Effort::XHigh => "xhigh",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|effort| effort.as_str() == normalized)
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetRecord {
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub effort: Option<Effort>,
    pub inputs_required: Option<String>,
    pub inputs_optional: Option<String>,
    pub outputs: Option<String>,
    pub system_prompt: String,
}

impl PresetRecord {
    fn header_fields(&self) -> [(&'static str, Option<String>); 6] {
        [
            ("description", self.description.as_deref().map(single_line)),
            ("model", self.model.as_deref().map(single_line)),
            ("effort", self.effort.map(|e| e.as_str().to_string())),
            ("inputs_required", self.inputs_required.as_deref().map(single_line)),
            ("inputs_optional", self.inputs_optional.as_deref().map(single_line)),
            ("outputs", self.outputs.as_deref().map(single_line)),
        ]
    }
}

/// Header values live on one line; embedded line breaks collapse to a space.
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == HEADER_DELIMITER
}

fn header_end(lines: &[&str]) -> Option<usize> {
    if !lines.first().is_some_and(|line| is_delimiter(line)) {
        return None;
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_delimiter(line))
        .map(|(idx, _)| idx)
}

fn apply_header_line(record: &mut PresetRecord, line: &str) {
    let Some((key, value)) = line.split_once(':') else {
        return;
    };
    let Some(value) = non_empty(value) else {
        return;
    };
    let key: String = key
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect();
    match key.as_str() {
        "description" => record.description = Some(value),
        "model" => record.model = Some(value),
        "effort" => {
            if let Some(effort) = Effort::parse(&value) {
                record.effort = Some(effort);
            }
        }
        "inputsrequired" => record.inputs_required = Some(value),
        "inputsoptional" => record.inputs_optional = Some(value),
        "outputs" => record.outputs = Some(value),
        _ => {}
    }
}

pub fn parse(text: &str) -> Result<PresetRecord, ToolError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut record = PresetRecord::default();
    let mut idx = 0;

    if let Some(end) = header_end(&lines) {
        for line in &lines[1..end] {
            apply_header_line(&mut record, line);
        }
        idx = end + 1;
    }

    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    if let Some(line) = lines.get(idx) {
        record.name = line.trim().trim_start_matches('#').trim().to_string();
        idx += 1;
    }

    if record.description.is_none() {
        if let Some(quoted) = lines
            .get(idx)
            .and_then(|line| line.trim_start().strip_prefix('>'))
        {
            record.description = non_empty(quoted);
            idx += 1;
        }
    }

    let body = lines.get(idx..).unwrap_or_default().join("\n");
    record.system_prompt = body.trim().to_string();
    if record.system_prompt.is_empty() {
        return Err(ToolError::invalid_params("preset has an empty system prompt"));
    }
    Ok(record)
}

pub fn render(record: &PresetRecord) -> String {
    let mut out = String::new();
    let present: Vec<(&str, String)> = record
        .header_fields()
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect();
    if !present.is_empty() {
        out.push_str(HEADER_DELIMITER);
        out.push('\n');
        for (key, value) in present {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push_str(HEADER_DELIMITER);
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "# {}\n\n{}\n",
        single_line(&record.name),
        record.system_prompt.trim()
    ));
    out
}
