use crate::constants::protocols::ALLOWED_HTTP;
use crate::errors::ToolError;
use url::Url;

fn scheme_allowed(scheme: &str) -> bool {
    ALLOWED_HTTP.iter().any(|allowed| *allowed == scheme)
}

fn same_endpoint(a: &str, b: &str) -> bool {
    a.trim().trim_end_matches('/') == b.trim().trim_end_matches('/')
}

/// Accepts `requested` as the completion endpoint or explains why not.
///
/// The URL must be a well-formed http(s) URL whatever the policy says. With
/// `allow_custom` off, anything other than `default_url` is denied.
pub fn validate_endpoint(
    requested: &str,
    allow_custom: bool,
    default_url: &str,
) -> Result<String, ToolError> {
    let candidate = requested.trim();
    let parsed = Url::parse(candidate).map_err(|err| {
        ToolError::invalid_endpoint(format!("Invalid endpoint URL '{}': {}", candidate, err))
    })?;
    if !scheme_allowed(parsed.scheme()) {
        return Err(ToolError::invalid_endpoint(format!(
            "Endpoint scheme '{}' is not allowed; use http or https",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ToolError::invalid_endpoint(format!(
            "Endpoint URL '{}' has no host",
            candidate
        )));
    }
    if !allow_custom && !same_endpoint(candidate, default_url) {
        return Err(ToolError::policy_denied(
            "Custom endpoints disabled: only the configured default endpoint may be used",
        )
        .with_hint("Omit baseUrl, or start the server with AGENT_ALLOW_CUSTOM_BASE_URL=1."));
    }
    Ok(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    const DEFAULT: &str = "http://127.0.0.1:3030/v1";

    #[test]
    fn default_endpoint_is_always_accepted() {
        assert_eq!(validate_endpoint(DEFAULT, false, DEFAULT).unwrap(), DEFAULT);
        assert_eq!(
            validate_endpoint(" http://127.0.0.1:3030/v1/ ", false, DEFAULT).unwrap(),
            "http://127.0.0.1:3030/v1/"
        );
    }

    #[test]
    fn custom_endpoint_denied_when_locked_down() {
        let err = validate_endpoint("http://evil.example/v1", false, DEFAULT).unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::PolicyDenied);
        assert!(err.message.contains("Custom endpoints disabled"));
    }

    #[test]
    fn custom_endpoint_accepted_when_allowed() {
        assert_eq!(
            validate_endpoint("https://llm.example/v1", true, DEFAULT).unwrap(),
            "https://llm.example/v1"
        );
    }

    #[test]
    fn non_http_scheme_is_invalid_regardless_of_policy() {
        for allow in [true, false] {
            let err = validate_endpoint("ftp://host/v1", allow, DEFAULT).unwrap_err();
            assert_eq!(err.kind, ToolErrorKind::InvalidEndpoint);
        }
        let err = validate_endpoint("file:///etc/passwd", true, DEFAULT).unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidEndpoint);
    }

    #[test]
    fn unparsable_url_is_invalid() {
        for raw in ["not a url", "", "http://"] {
            let err = validate_endpoint(raw, true, DEFAULT).unwrap_err();
            assert_eq!(err.kind, ToolErrorKind::InvalidEndpoint, "input {:?}", raw);
        }
    }
}
