use thiserror::Error;

use crate::http_client::HttpClientError;

/// Protocol-level failures, reported to the client as JSON-RPC errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("internal error: {message}")]
    Internal { code: &'static str, message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }
}

/// Tool failures, reported in-band as an error envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for get request: {0}")]
    InvalidArguments(String),
    #[error("Url should be provided")]
    MissingUrl,
    #[error(transparent)]
    Http(#[from] HttpClientError),
}

/// Renders an error followed by every distinct message in its `source()` chain.
pub fn describe_error_chain(err: &dyn std::error::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !description.contains(&cause_text) {
            description.push_str(": ");
            description.push_str(&cause_text);
        }
        source = cause.source();
    }

    description
}

#[cfg(test)]
mod tests {
    use super::{describe_error_chain, AppError, ToolError};
    use crate::http_client::HttpClientError;

    #[derive(Debug, thiserror::Error)]
    #[error("tcp connect error")]
    struct ConnectError(#[source] std::io::Error);

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct SendError(#[source] ConnectError);

    #[test]
    fn describes_nested_sources() {
        let err = SendError(ConnectError(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        )));

        assert_eq!(
            describe_error_chain(&err),
            "error sending request: tcp connect error: Connection refused"
        );
    }

    #[test]
    fn error_without_source_renders_its_message() {
        let err = AppError::bad_request("invalid_protocol_version", "protocolVersion is required");
        assert_eq!(
            describe_error_chain(&err),
            "bad request: protocolVersion is required"
        );
    }

    #[test]
    fn tool_errors_render_caller_facing_text() {
        assert_eq!(
            ToolError::UnknownTool("post".to_string()).to_string(),
            "Unknown tool: post"
        );
        assert_eq!(
            ToolError::InvalidArguments("missing field `url`".to_string()).to_string(),
            "Invalid arguments for get request: missing field `url`"
        );
        assert_eq!(
            ToolError::from(HttpClientError::Request("dns error".to_string())).to_string(),
            "dns error"
        );
    }
}
