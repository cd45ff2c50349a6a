//! Audit log helpers
//!
//! Tool arguments are logged on every call. For the `get` tool the secrets
//! that matter live inside the URL: userinfo and query parameters such as
//! `?access_token=...`. Both are masked before anything reaches the log.

use reqwest::Url;
use serde_json::Value;

use crate::mcp::rpc::is_json_rpc_error;

pub const REDACTED: &str = "[REDACTED]";

/// `tool_error` marks calls that succeeded at the protocol level but carry `isError`.
pub fn audit_outcome(response: &Value) -> &'static str {
    if is_json_rpc_error(response) {
        "failure"
    } else if response["result"]["isError"] == Value::Bool(true) {
        "tool_error"
    } else {
        "success"
    }
}

pub fn redact_params(params: Option<&Value>) -> Value {
    params.map(redact_value).unwrap_or(Value::Null)
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    let redacted = match item {
                        _ if is_sensitive_name(key) => Value::String(REDACTED.to_string()),
                        Value::String(text) if key == "url" => Value::String(redact_url(text)),
                        _ => redact_value(item),
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        _ => value.clone(),
    }
}

/// Masks userinfo and sensitive query values. Anything else is returned as given.
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let mut changed = false;
    if !url.username().is_empty() {
        changed |= url.set_username(REDACTED).is_ok();
    }
    if url.password().is_some() {
        changed |= url.set_password(Some(REDACTED)).is_ok();
    }

    if url.query_pairs().any(|(name, _)| is_sensitive_name(&name)) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| {
                let value = if is_sensitive_name(&name) {
                    REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (name.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        changed = true;
    }

    if !changed {
        return raw.to_string();
    }

    url.to_string()
}

/// Names that carry credentials, whether as JSON keys or query parameters.
pub fn is_sensitive_name(name: &str) -> bool {
    let normalized = name.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "auth" | "key" | "api_key" | "apikey" | "sig" | "signature" | "cookie"
    ) || ["token", "secret", "password", "credential"]
        .iter()
        .any(|marker| normalized.contains(marker))
}
