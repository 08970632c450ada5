//! Binary payload resolution for upload tools.
//!
//! A payload comes from exactly one source, by precedence: inline base64, then a URL, then a
//! local file. Every check here runs before the device is contacted.

use crate::envelope::ToolFailure;
use base64::Engine as _;
use std::time::Duration;

/// What kind of payload a tool accepts and how small it may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadKind {
    pub label: &'static str,
    pub inline_field: &'static str,
    pub min_len: usize,
    /// What the minimum covers, for the "too small" message.
    pub minimum_covers: Option<&'static str>,
}

pub const SID: PayloadKind = PayloadKind {
    label: "SID",
    inline_field: "sidDataBase64",
    min_len: 4,
    minimum_covers: Some("header"),
};

pub const PRG: PayloadKind = PayloadKind {
    label: "PRG",
    inline_field: "prgDataBase64",
    min_len: 2,
    minimum_covers: Some("load address"),
};

pub const CRT: PayloadKind = PayloadKind {
    label: "CRT",
    inline_field: "crtDataBase64",
    min_len: 64,
    minimum_covers: Some("header"),
};

pub const MOD: PayloadKind = PayloadKind {
    label: "MOD",
    inline_field: "modDataBase64",
    min_len: 1,
    minimum_covers: None,
};

pub const DISK_IMAGE: PayloadKind = PayloadKind {
    label: "disk image",
    inline_field: "diskDataBase64",
    min_len: 1,
    minimum_covers: None,
};

pub const DRIVE_ROM: PayloadKind = PayloadKind {
    label: "ROM",
    inline_field: "romDataBase64",
    min_len: 1,
    minimum_covers: None,
};

pub const MEMORY: PayloadKind = PayloadKind {
    label: "memory",
    inline_field: "dataBase64",
    min_len: 1,
    minimum_covers: None,
};

/// The candidate sources supplied by the caller. Empty strings count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadSource<'a> {
    pub inline: Option<&'a str>,
    pub url: Option<&'a str>,
    pub file_path: Option<&'a str>,
}

impl PayloadSource<'_> {
    /// Short description of the source that will be used, for log and result messages.
    #[must_use]
    pub fn origin(&self) -> String {
        if present(self.inline).is_some() {
            "base64 data".to_string()
        } else if let Some(url) = present(self.url) {
            format!("URL {url}")
        } else if let Some(path) = present(self.file_path) {
            format!("file {path}")
        } else {
            "nothing".to_string()
        }
    }
}

/// Fetches payload bytes. Holds its own HTTP client for URL sources.
#[derive(Debug, Clone)]
pub struct PayloadResolver {
    http: reqwest::Client,
}

impl PayloadResolver {
    /// # Errors
    ///
    /// Returns an error if the download client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Resolve the payload and check it against the kind's size rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolFailure`] naming the first problem found.
    pub async fn resolve(
        &self,
        kind: &PayloadKind,
        source: PayloadSource<'_>,
    ) -> Result<Vec<u8>, ToolFailure> {
        let data = if let Some(encoded) = present(source.inline) {
            decode_base64(encoded)?
        } else if let Some(url) = present(source.url) {
            self.download(url).await?
        } else if let Some(path) = present(source.file_path) {
            read_file(path).await?
        } else {
            return Err(ToolFailure::new(format!(
                "One of filePath, {}, or url must be provided",
                kind.inline_field
            )));
        };

        check_size(kind, &data)?;
        Ok(data)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ToolFailure> {
        tracing::info!(url = %url, "downloading payload");
        let fail = |e: reqwest::Error| {
            ToolFailure::new(format!(
                "Failed to download from URL: {}",
                ultimate_client::error::sanitize_reqwest_error(&e)
            ))
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fail)?;
        let bytes = response.bytes().await.map_err(fail)?;
        Ok(bytes.to_vec())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, ToolFailure> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ToolFailure::new(format!("Invalid base64 data: {e}")))
}

async fn read_file(path: &str) -> Result<Vec<u8>, ToolFailure> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ToolFailure::new(format!("File not found: {path}")))
        }
        Err(e) => Err(ToolFailure::new(format!("Failed to read file: {e}"))),
    }
}

fn check_size(kind: &PayloadKind, data: &[u8]) -> Result<(), ToolFailure> {
    if data.is_empty() {
        return Err(ToolFailure::new(format!(
            "No {} data provided or data is empty",
            kind.label
        )));
    }
    if data.len() < kind.min_len {
        let covers = kind
            .minimum_covers
            .map(|what| format!(" for {what}"))
            .unwrap_or_default();
        return Err(ToolFailure::new(format!(
            "{} file is too small (must be at least {} bytes{covers})",
            kind.label, kind.min_len
        )));
    }
    Ok(())
}
