//! The JSON envelope every tool returns.
//!
//! Success: `{"success": true, ...fields}`.
//! Failure: `{"success": false, "error": "...", "errors": [...]?, ...details}`.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value, json};
use ultimate_basic::BasicError;
use ultimate_client::ClientError;

/// A failed tool operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolFailure {
    pub message: String,
    pub api_errors: Option<Vec<String>>,
    pub details: Map<String, Value>,
}

impl ToolFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            api_errors: None,
            details: Map::new(),
        }
    }

    /// Attach an extra field to the failure envelope.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl From<ClientError> for ToolFailure {
    fn from(err: ClientError) -> Self {
        Self {
            message: err.to_string(),
            api_errors: err.api_errors().map(<[String]>::to_vec),
            details: Map::new(),
        }
    }
}

impl From<BasicError> for ToolFailure {
    fn from(err: BasicError) -> Self {
        Self::new(err.to_string()).with_detail("errorType", err.kind())
    }
}

pub type ToolResult = std::result::Result<Map<String, Value>, ToolFailure>;

/// Builder for success payloads.
#[derive(Debug, Default)]
pub struct Fields(Map<String, Value>);

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn done(self) -> ToolResult {
        Ok(self.0)
    }
}

/// Success payload carrying only a human-readable message.
#[must_use]
pub fn message(text: impl Into<String>) -> ToolResult {
    Fields::new().with("message", text.into()).done()
}

/// Render a tool result as its envelope.
#[must_use]
pub fn to_envelope(result: &ToolResult) -> Value {
    let mut out = Map::new();
    match result {
        Ok(fields) => {
            out.insert("success".to_string(), json!(true));
            for (k, v) in fields {
                out.insert(k.clone(), v.clone());
            }
        }
        Err(failure) => {
            out.insert("success".to_string(), json!(false));
            out.insert("error".to_string(), json!(failure.message));
            if let Some(errors) = &failure.api_errors {
                out.insert("errors".to_string(), json!(errors));
            }
            for (k, v) in &failure.details {
                out.insert(k.clone(), v.clone());
            }
        }
    }
    Value::Object(out)
}

/// Wrap a tool result for MCP. Failures are flagged `is_error` but still carry the envelope.
#[must_use]
pub fn to_call_result(result: &ToolResult) -> CallToolResult {
    let content = vec![Content::text(to_envelope(result).to_string())];
    if result.is_ok() {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}
