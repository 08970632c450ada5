//! Response normalization shared by every device call.
//!
//! The device reports failures two ways: a non-success HTTP status, or a 2xx body carrying an
//! `errors` array. Both are turned into [`ClientError`] here before any result is decoded.

use crate::error::{ClientError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Body of a successful response after the embedded-errors check.
#[derive(Debug)]
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Text(String, serde_json::Error),
}

pub(crate) fn check_status(status: StatusCode, body: &[u8]) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let body = String::from_utf8_lossy(body).into_owned();
    tracing::warn!(status = status.as_u16(), body = %body, "device returned HTTP error");
    Err(ClientError::Status { status, body })
}

/// Parse the body and fail if it reports errors.
pub(crate) fn inspect(body: &[u8]) -> Result<Payload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::Empty);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => {
            if let Some(errors) = embedded_errors(&value) {
                tracing::warn!(errors = ?errors, "device reported errors");
                return Err(ClientError::Api { errors });
            }
            Ok(Payload::Json(value))
        }
        Err(e) => Ok(Payload::Text(String::from_utf8_lossy(body).into_owned(), e)),
    }
}

/// The non-empty `errors` list of a JSON body, if present.
pub(crate) fn embedded_errors(value: &Value) -> Option<Vec<String>> {
    let list = value
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("errors"))
        .and_then(|(_, v)| v.as_array())?;

    let errors: Vec<String> = list
        .iter()
        .map(|e| match e {
            Value::Null => "Unknown error".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect();

    (!errors.is_empty()).then_some(errors)
}

/// Decode a typed result. Top-level field names match case-insensitively.
pub(crate) fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T> {
    match payload {
        Payload::Empty => Err(ClientError::EmptyResponse),
        Payload::Text(_, e) => Err(ClientError::InvalidJson(e)),
        Payload::Json(value) => {
            serde_json::from_value(fold_keys(value)).map_err(ClientError::InvalidJson)
        }
    }
}

/// Return a free-form JSON document unchanged.
pub(crate) fn document(payload: Payload) -> Result<Value> {
    match payload {
        Payload::Empty => Err(ClientError::EmptyResponse),
        Payload::Text(_, e) => Err(ClientError::InvalidJson(e)),
        Payload::Json(value) => Ok(value),
    }
}

fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}
