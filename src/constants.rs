pub mod network {
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3030/v1";
    pub const TIMEOUT_AGENT_CALL_MS: u64 = 300_000;
    pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
    pub const POOL_IDLE_TIMEOUT_MS: u64 = 90_000;
}

pub mod defaults {
    pub const MODEL: &str = "gpt-5";
}

pub mod limits {
    pub const MAX_CACHED_CLIENTS: usize = 32;
    pub const UPSTREAM_ERROR_EXCERPT_BYTES: usize = 2048;
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http", "https"];
}

pub mod files {
    pub const PRESET_EXTENSION: &str = "md";
    pub const PRESET_FILE_MODE: u32 = 0o644;
}
