use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    NotFound,
    AlreadyExists,
    PolicyDenied,
    InvalidEndpoint,
    Timeout,
    Upstream,
    Io,
    Internal,
}

impl ToolErrorKind {
    /// Stable machine-readable code, logged with every failure.
    pub fn code(self) -> &'static str {
        match self {
            ToolErrorKind::InvalidParams => "INVALID_PARAMS",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ToolErrorKind::PolicyDenied => "POLICY_DENIED",
            ToolErrorKind::InvalidEndpoint => "INVALID_ENDPOINT",
            ToolErrorKind::Timeout => "TIMEOUT",
            ToolErrorKind::Upstream => "UPSTREAM_ERROR",
            ToolErrorKind::Io => "IO_FAILURE",
            ToolErrorKind::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::AlreadyExists, message)
    }

    pub fn policy_denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::PolicyDenied, message)
    }

    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidEndpoint, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Upstream, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Io, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }

    /// Text form returned to callers in place of a protocol error.
    pub fn to_content_text(&self) -> String {
        match &self.hint {
            Some(hint) => format!("ERROR: {}\n{}", self.message, hint),
            None => format!("ERROR: {}", self.message),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::io(err.to_string())
    }
}
