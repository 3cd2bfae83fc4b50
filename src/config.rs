use crate::constants::defaults;
use crate::constants::network::{DEFAULT_BASE_URL, TIMEOUT_AGENT_CALL_MS};
use crate::services::logger::LogLevel;
use crate::utils::feature_flags::is_truthy;
use crate::utils::paths::{resolve_bundled_presets_dir, resolve_presets_dir};
use crate::utils::preset_codec::Effort;
use crate::utils::text::non_blank;
use serde_json::Value;
use std::path::PathBuf;

/// Process-wide defaults for agent calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefaults {
    pub base_url: String,
    pub model: String,
    pub effort: Option<Effort>,
    pub allow_custom_base_url: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: AgentDefaults,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub presets_dir: PathBuf,
    pub bundled_presets_dir: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Effort value that was set but not recognised; reported once at startup.
    pub ignored_effort: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            non_blank(lookup(key).as_deref())
                .filter(|v| !matches!(v.to_lowercase().as_str(), "undefined" | "null"))
        };

        let raw_effort = get("AGENT_EFFORT");
        let effort = raw_effort.as_deref().and_then(Effort::parse);
        let ignored_effort = raw_effort.filter(|_| effort.is_none());

        let timeout_ms = get("AGENT_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(TIMEOUT_AGENT_CALL_MS);

        Self {
            defaults: AgentDefaults {
                base_url: get("AGENT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: get("AGENT_MODEL").unwrap_or_else(|| defaults::MODEL.to_string()),
                effort,
                allow_custom_base_url: get("AGENT_ALLOW_CUSTOM_BASE_URL")
                    .map(is_truthy)
                    .unwrap_or(false),
            },
            api_key: get("AGENT_API_KEY").or_else(|| get("OPENAI_API_KEY")),
            timeout_ms,
            presets_dir: resolve_presets_dir(&lookup),
            bundled_presets_dir: resolve_bundled_presets_dir(&lookup),
            log_level: LogLevel::parse(lookup("LOG_LEVEL").as_deref()),
            ignored_effort,
        }
    }

    pub fn summary(&self) -> Value {
        serde_json::json!({
            "base_url": self.defaults.base_url,
            "model": self.defaults.model,
            "effort": self.defaults.effort.map(|e| e.as_str()),
            "allow_custom_base_url": self.defaults.allow_custom_base_url,
            "api_key_set": self.api_key.is_some(),
            "timeout_ms": self.timeout_ms,
            "presets_dir": self.presets_dir,
            "bundled_presets_dir": self.bundled_presets_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key: &str| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[("HOME", "/home/u")]);
        assert_eq!(config.defaults.base_url, "http://127.0.0.1:3030/v1");
        assert_eq!(config.defaults.model, "gpt-5");
        assert_eq!(config.defaults.effort, None);
        assert!(!config.defaults.allow_custom_base_url);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_ms, 300_000);
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = config_from(&[
            ("AGENT_BASE_URL", "https://llm.internal/v1"),
            ("AGENT_MODEL", "o4-mini"),
            ("AGENT_EFFORT", "High"),
            ("AGENT_TIMEOUT_MS", "1500"),
            ("AGENT_ALLOW_CUSTOM_BASE_URL", "yes"),
            ("OPENAI_API_KEY", "sk-fallback"),
            ("AGENT_PRESETS_DIR", "/tmp/presets"),
        ]);
        assert_eq!(config.defaults.base_url, "https://llm.internal/v1");
        assert_eq!(config.defaults.model, "o4-mini");
        assert_eq!(config.defaults.effort, Some(Effort::High));
        assert!(config.defaults.allow_custom_base_url);
        assert_eq!(config.api_key.as_deref(), Some("sk-fallback"));
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.presets_dir, PathBuf::from("/tmp/presets"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("AGENT_EFFORT", "extreme"),
            ("AGENT_TIMEOUT_MS", "soon"),
            ("AGENT_MODEL", "   "),
        ]);
        assert_eq!(config.defaults.effort, None);
        assert_eq!(config.ignored_effort.as_deref(), Some("extreme"));
        assert_eq!(config.timeout_ms, 300_000);
        assert_eq!(config.defaults.model, "gpt-5");
    }

    #[test]
    fn summary_hides_api_key() {
        let config = config_from(&[("AGENT_API_KEY", "sk-secret")]);
        let summary = config.summary().to_string();
        assert!(!summary.contains("sk-secret"));
        assert!(summary.contains("\"api_key_set\":true"));
    }
}
