//! MCP tool annotations.
//!
//! Device tools get hints from the HTTP method of the endpoint they call, using RFC 9110-style
//! method semantics.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Annotations for a tool backed by a device endpoint.
///
/// `openWorldHint` is always `true`: these tools act on a physical machine.
#[must_use]
pub fn annotations_for_method(title: &str, method: &Method) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = if method == Method::GET {
        (Some(true), Some(false), Some(true))
    } else if method == Method::PUT {
        (Some(false), Some(true), Some(true))
    } else if method == Method::POST {
        (Some(false), Some(false), Some(false))
    } else {
        (None, None, None)
    };

    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}

/// Annotations for a tool that runs locally and never touches the device.
#[must_use]
pub fn local_annotations(title: &str) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(false),
    }
}
