//! A tiny in-memory model of the device for round-trip tests.

use crate::{RecordedRequest, StubReply};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration values written through the stub, keyed by raw `(category, item)` path segments.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    configs: Arc<Mutex<HashMap<(String, String), String>>>,
}

impl DeviceState {
    #[must_use]
    pub fn config(&self, category: &str, item: &str) -> Option<String> {
        self.configs
            .lock()
            .get(&(category.to_string(), item.to_string()))
            .cloned()
    }
}

/// Responder that remembers config writes and serves them back on reads.
///
/// `GET /v1/version` answers a fixed version; every other call succeeds with an empty
/// `errors` array.
pub fn stateful_device(
    state: DeviceState,
) -> impl Fn(&RecordedRequest) -> StubReply + Send + Sync + 'static {
    move |req| {
        if req.method == "GET" && req.path == "/v1/version" {
            return StubReply::json(&json!({"version": "0.1", "errors": []}));
        }

        let Some(rest) = req.path.strip_prefix("/v1/configs/") else {
            return StubReply::ok();
        };
        let Some((category, item)) = rest.split_once('/') else {
            return StubReply::ok();
        };
        let key = (category.to_string(), item.to_string());

        match req.method.as_str() {
            "PUT" => {
                let value = req.query_param("value").unwrap_or_default();
                state.configs.lock().insert(key, value);
                StubReply::ok()
            }
            "GET" => match state.configs.lock().get(&key) {
                Some(value) => StubReply::json(&json!({
                    category: { item: value },
                    "errors": [],
                })),
                None => StubReply::json(&json!({"errors": ["Item not found"]})).with_status(404),
            },
            _ => StubReply::ok(),
        }
    }
}
