//! Error types for the device client.

use reqwest::StatusCode;
use thiserror::Error;

/// Every failure a device call can produce.
///
/// The `Display` text is the message surfaced to callers. Errors reported by the device itself
/// are available through [`ClientError::api_errors`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base address is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request never produced a response (connect failure, timeout, reset).
    #[error("Request failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-success status.
    #[error("API error: HTTP {}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    /// The device answered 2xx but reported errors in the body.
    #[error("API returned errors")]
    Api { errors: Vec<String> },

    /// The body could not be decoded into the expected shape.
    #[error("Invalid JSON response")]
    InvalidJson(#[source] serde_json::Error),

    /// A call that expects a result received an empty body.
    #[error("Empty response body")]
    EmptyResponse,

    /// The client was closed before the call was issued.
    #[error("Client is closed")]
    Closed,
}

/// Result type alias for device calls.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Errors reported by the device in the response body, if any.
    #[must_use]
    pub fn api_errors(&self) -> Option<&[String]> {
        match self {
            Self::Api { errors } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status of a rejected call.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            message: sanitize_reqwest_error(&source),
            source,
        }
    }
}

/// Render a reqwest error without credentials or query strings from the request URL.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        let mut redacted = u.clone();
        let _ = redacted.set_username("");
        let _ = redacted.set_password(None);
        redacted.set_query(None);
        redacted.set_fragment(None);
        msg = msg.replace(u.as_str(), redacted.as_str());
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::ClientError;
    use reqwest::StatusCode;

    #[test]
    fn status_error_message_names_the_code() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "API error: HTTP 404");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.api_errors().is_none());
    }

    #[test]
    fn api_error_exposes_device_errors() {
        let err = ClientError::Api {
            errors: vec!["Drive not found".to_string()],
        };
        assert_eq!(err.to_string(), "API returned errors");
        assert_eq!(err.api_errors(), Some(&["Drive not found".to_string()][..]));
    }
}
