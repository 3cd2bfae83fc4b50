use std::path::PathBuf;

const APP_DIR: &str = "agentkit";

pub fn normalize_env_path(value: Option<String>) -> Option<PathBuf> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if lowered == "undefined" || lowered == "null" {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn resolve_xdg_state_dir(lookup: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = normalize_env_path(lookup("XDG_STATE_HOME")) {
        return Some(path);
    }
    normalize_env_path(lookup("HOME")).map(|home| home.join(".local").join("state"))
}

pub fn resolve_entry_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
}

pub fn resolve_presets_dir(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = normalize_env_path(lookup("AGENT_PRESETS_DIR")) {
        return path;
    }
    if let Some(path) = resolve_xdg_state_dir(lookup) {
        return path.join(APP_DIR).join("presets");
    }
    resolve_entry_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("presets-store")
}

/// Bundled presets ship next to the binary, or in the source tree during
/// development. Returns the first existing candidate.
pub fn resolve_bundled_presets_dir(lookup: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = normalize_env_path(lookup("AGENT_BUNDLED_PRESETS_DIR")) {
        return Some(path);
    }
    let mut candidates = Vec::new();
    if let Some(entry) = resolve_entry_dir() {
        candidates.push(entry.join("presets"));
        candidates.push(entry.join("..").join("presets"));
    }
    candidates.push(PathBuf::from("presets"));
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("presets"));
    candidates.into_iter().find(|candidate| candidate.is_dir())
}
