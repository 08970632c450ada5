//! Request descriptions for device endpoints.

use crate::error::{ClientError, Result};
use reqwest::Method;
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryPair {
    key: &'static str,
    value: String,
    allow_reserved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Binary(Vec<u8>),
}

/// One HTTP exchange with the device: method, path, query and body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EndpointCall {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<QueryPair>,
    pub(crate) body: RequestBody,
}

impl EndpointCall {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push(QueryPair {
            key,
            value: value.to_string(),
            allow_reserved: false,
        });
        self
    }

    /// Like [`EndpointCall::query`] but keeps `:` and `/` readable (host:port values).
    pub(crate) fn query_reserved(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push(QueryPair {
            key,
            value: value.to_string(),
            allow_reserved: true,
        });
        self
    }

    pub(crate) fn query_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub(crate) fn binary(mut self, data: Vec<u8>) -> Self {
        self.body = RequestBody::Binary(data);
        self
    }

    pub(crate) fn url(&self, base_url: &Url) -> Result<Url> {
        build_url(base_url, &self.path, &self.query)
    }
}

/// Percent-encode a single path segment (category names, file paths, drive ids).
pub(crate) fn segment(s: &str) -> String {
    encode_component(s, false)
}

fn build_url(base_url: &Url, path: &str, query: &[QueryPair]) -> Result<Url> {
    let joined = format!("{}{}", base_url.as_str().trim_end_matches('/'), path);
    let mut url = Url::parse(&joined).map_err(|e| ClientError::InvalidBaseUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;

    if !query.is_empty() {
        let mut out = String::new();
        for (i, p) in query.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(&encode_component(p.key, false));
            out.push('=');
            out.push_str(&encode_component(&p.value, p.allow_reserved));
        }
        url.set_query(Some(&out));
    }

    Ok(url)
}

fn encode_component(s: &str, allow_reserved: bool) -> String {
    // '&' and '=' are always encoded so values cannot break the query string.
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        let keep = is_unreserved(b) || (allow_reserved && matches!(b, b':' | b'/' | b'[' | b']'));
        if keep {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
