//! The device client: one async method per REST endpoint.
//!
//! Every method follows the same protocol: build an [`EndpointCall`], send it through the shared
//! HTTP client, reject non-success statuses, reject bodies that carry an `errors` array, then
//! decode the result (or ignore the body for unit calls). All methods fail with
//! [`ClientError`]; the individual methods do not repeat that in their docs.

use crate::error::{ClientError, Result};
use crate::models::{
    ConfigCategories, DebugRegister, DiskFormat, DrivesInfo, MountOptions, VersionInfo,
};
use crate::request::{EndpointCall, RequestBody, segment};
use crate::response::{Payload, check_status, decode, document, inspect};
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Async client for the Ultimate REST API (`/v1/...`).
///
/// Cheap to share behind an `Arc`; all calls reuse one connection pool.
pub struct UltimateClient {
    base_url: Url,
    timeout: Duration,
    http: RwLock<Option<reqwest::Client>>,
}

impl std::fmt::Debug for UltimateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UltimateClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl UltimateClient {
    /// Timeout applied when none is given at construction.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client for the device at `base_url` (e.g. `http://192.168.0.120`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an absolute http(s) URL, or
    /// [`ClientError::Build`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an absolute http(s) URL with a host".to_string(),
            });
        }

        let timeout = timeout.unwrap_or(Self::DEFAULT_TIMEOUT);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: parsed,
            timeout,
            http: RwLock::new(Some(http)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Release the connection pool. Returns `true` only for the call that released it.
    ///
    /// Calls issued afterwards fail with [`ClientError::Closed`].
    pub fn close(&self) -> bool {
        let released = self.http.write().take().is_some();
        if released {
            tracing::debug!(base_url = %self.base_url, "device client closed");
        }
        released
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.http.read().is_none()
    }

    // --- about -------------------------------------------------------------------------------

    pub async fn version(&self) -> Result<VersionInfo> {
        self.fetch(EndpointCall::get("/v1/version")).await
    }

    // --- machine -----------------------------------------------------------------------------

    pub async fn reset_machine(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:reset")).await
    }

    pub async fn reboot_machine(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:reboot")).await
    }

    pub async fn pause_machine(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:pause")).await
    }

    pub async fn resume_machine(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:resume")).await
    }

    pub async fn power_off_machine(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:poweroff"))
            .await
    }

    /// Simulate a press of the Ultimate menu button.
    pub async fn press_menu_button(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/machine:menu_button"))
            .await
    }

    /// Read `length` bytes of C64 memory starting at `address` (hex, e.g. `D020`).
    pub async fn read_memory(&self, address: &str, length: u32) -> Result<Vec<u8>> {
        self.send(
            EndpointCall::get("/v1/machine:readmem")
                .query("address", address)
                .query("length", length),
        )
        .await
    }

    /// Write hex-encoded bytes (`data`, e.g. `0102FF`) at `address`.
    pub async fn write_memory(&self, address: &str, data: &str) -> Result<()> {
        self.execute(
            EndpointCall::put("/v1/machine:writemem")
                .query("address", address)
                .query("data", data),
        )
        .await
    }

    pub async fn write_memory_binary(&self, address: &str, data: Vec<u8>) -> Result<()> {
        self.execute(
            EndpointCall::post("/v1/machine:writemem")
                .query("address", address)
                .binary(data),
        )
        .await
    }

    /// Read the debug register (`$D7FF`). The device answers with a hex string.
    pub async fn debug_register(&self) -> Result<String> {
        self.fetch_register(EndpointCall::get("/v1/machine:debugreg"))
            .await
    }

    pub async fn set_debug_register(&self, value: &str) -> Result<String> {
        self.fetch_register(EndpointCall::put("/v1/machine:debugreg").query("value", value))
            .await
    }

    // --- runners -----------------------------------------------------------------------------

    /// Play a SID file stored on the device. `song` selects a sub-tune.
    pub async fn play_sid(&self, file: &str, song: Option<u32>) -> Result<()> {
        self.execute(
            EndpointCall::put("/v1/runners:sidplay")
                .query("file", file)
                .query_opt("songnr", song),
        )
        .await
    }

    pub async fn play_sid_binary(&self, data: Vec<u8>, song: Option<u32>) -> Result<()> {
        self.execute(
            EndpointCall::post("/v1/runners:sidplay")
                .query_opt("songnr", song)
                .binary(data),
        )
        .await
    }

    pub async fn play_mod(&self, file: &str) -> Result<()> {
        self.execute(EndpointCall::put("/v1/runners:modplay").query("file", file))
            .await
    }

    pub async fn play_mod_binary(&self, data: Vec<u8>) -> Result<()> {
        self.execute(EndpointCall::post("/v1/runners:modplay").binary(data))
            .await
    }

    /// Load a PRG into memory without running it.
    pub async fn load_program(&self, file: &str) -> Result<()> {
        self.execute(EndpointCall::put("/v1/runners:load_prg").query("file", file))
            .await
    }

    pub async fn run_program(&self, file: &str) -> Result<()> {
        self.execute(EndpointCall::put("/v1/runners:run_prg").query("file", file))
            .await
    }

    pub async fn run_program_binary(&self, data: Vec<u8>) -> Result<()> {
        self.execute(EndpointCall::post("/v1/runners:run_prg").binary(data))
            .await
    }

    pub async fn run_cartridge(&self, file: &str) -> Result<()> {
        self.execute(EndpointCall::put("/v1/runners:run_crt").query("file", file))
            .await
    }

    pub async fn run_cartridge_binary(&self, data: Vec<u8>) -> Result<()> {
        self.execute(EndpointCall::post("/v1/runners:run_crt").binary(data))
            .await
    }

    // --- configuration -----------------------------------------------------------------------

    pub async fn config_categories(&self) -> Result<ConfigCategories> {
        self.fetch(EndpointCall::get("/v1/configs")).await
    }

    pub async fn config_category(&self, category: &str) -> Result<Value> {
        let path = format!("/v1/configs/{}", segment(category));
        self.fetch_document(EndpointCall::get(path)).await
    }

    pub async fn config_item(&self, category: &str, item: &str) -> Result<Value> {
        let path = format!("/v1/configs/{}/{}", segment(category), segment(item));
        self.fetch_document(EndpointCall::get(path)).await
    }

    pub async fn set_config_item(&self, category: &str, item: &str, value: &str) -> Result<()> {
        let path = format!("/v1/configs/{}/{}", segment(category), segment(item));
        self.execute(EndpointCall::put(path).query("value", value))
            .await
    }

    /// Apply several settings at once. `settings` maps category → item → value.
    pub async fn update_configs(&self, settings: &Value) -> Result<()> {
        self.execute(EndpointCall::post("/v1/configs").json(settings.clone()))
            .await
    }

    pub async fn save_config_to_flash(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/configs:save_to_flash"))
            .await
    }

    pub async fn load_config_from_flash(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/configs:load_from_flash"))
            .await
    }

    pub async fn reset_config_to_default(&self) -> Result<()> {
        self.execute(EndpointCall::put("/v1/configs:reset_to_default"))
            .await
    }

    // --- drives ------------------------------------------------------------------------------

    pub async fn drives(&self) -> Result<DrivesInfo> {
        self.fetch(EndpointCall::get("/v1/drives")).await
    }

    /// Mount an image stored on the device filesystem.
    pub async fn mount_disk(&self, drive: &str, image: &str, options: &MountOptions) -> Result<()> {
        self.execute(
            EndpointCall::put(drive_path(drive, "mount"))
                .query("image", image)
                .query_opt("type", options.image_type.as_deref())
                .query_opt("mode", options.mode.as_deref()),
        )
        .await
    }

    /// Upload and mount an image.
    pub async fn mount_disk_binary(
        &self,
        drive: &str,
        data: Vec<u8>,
        options: &MountOptions,
    ) -> Result<()> {
        self.execute(
            EndpointCall::post(drive_path(drive, "mount"))
                .query_opt("type", options.image_type.as_deref())
                .query_opt("mode", options.mode.as_deref())
                .binary(data),
        )
        .await
    }

    pub async fn unmount_disk(&self, drive: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "remove")))
            .await
    }

    pub async fn reset_drive(&self, drive: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "reset")))
            .await
    }

    pub async fn enable_drive(&self, drive: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "on")))
            .await
    }

    pub async fn disable_drive(&self, drive: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "off")))
            .await
    }

    /// Switch the emulated drive type (`1541`, `1571`, `1581`).
    pub async fn set_drive_mode(&self, drive: &str, mode: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "set_mode")).query("mode", mode))
            .await
    }

    pub async fn load_drive_rom(&self, drive: &str, file: &str) -> Result<()> {
        self.execute(EndpointCall::put(drive_path(drive, "load_rom")).query("file", file))
            .await
    }

    pub async fn load_drive_rom_binary(&self, drive: &str, data: Vec<u8>) -> Result<()> {
        self.execute(EndpointCall::post(drive_path(drive, "load_rom")).binary(data))
            .await
    }

    // --- data streams ------------------------------------------------------------------------

    /// Start a `video`, `audio` or `debug` stream towards `ip` (optionally `ip:port`).
    pub async fn start_stream(&self, stream: &str, ip: &str, port: Option<u16>) -> Result<()> {
        let destination = match port {
            Some(port) => format!("{ip}:{port}"),
            None => ip.to_string(),
        };
        self.execute(
            EndpointCall::put(format!("/v1/streams/{}:start", segment(stream)))
                .query_reserved("ip", destination),
        )
        .await
    }

    pub async fn stop_stream(&self, stream: &str) -> Result<()> {
        let path = format!("/v1/streams/{}:stop", segment(stream));
        self.execute(EndpointCall::put(path)).await
    }

    // --- files -------------------------------------------------------------------------------

    pub async fn file_info(&self, path: &str) -> Result<Value> {
        let path = format!("/v1/files/{}:info", segment(path));
        self.fetch_document(EndpointCall::get(path)).await
    }

    /// Create an empty disk image at `path` on the device filesystem.
    pub async fn create_disk_image(
        &self,
        path: &str,
        format: DiskFormat,
        disk_name: Option<&str>,
    ) -> Result<()> {
        self.execute(
            EndpointCall::put(format!("/v1/files/{}:{}", segment(path), format.action()))
                .query_opt("tracks", format.tracks())
                .query_opt("diskname", disk_name),
        )
        .await
    }

    // --- plumbing ----------------------------------------------------------------------------

    fn http(&self) -> Result<reqwest::Client> {
        self.http.read().clone().ok_or(ClientError::Closed)
    }

    /// Send the call and return the body of a successful response.
    async fn send(&self, call: EndpointCall) -> Result<Vec<u8>> {
        let http = self.http()?;
        let url = call.url(&self.base_url)?;
        tracing::debug!(method = %call.method, path = %call.path, "device request");

        let mut request = http.request(call.method, url);
        request = match call.body {
            RequestBody::Empty => request,
            RequestBody::Json(body) => request.json(&body),
            RequestBody::Binary(data) => request
                .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
                .body(data),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        check_status(status, &body)?;
        Ok(body.to_vec())
    }

    async fn execute(&self, call: EndpointCall) -> Result<()> {
        let body = self.send(call).await?;
        if let Payload::Text(text, _) = inspect(&body)? {
            tracing::debug!(body = %text, "device returned a non-JSON body");
        }
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, call: EndpointCall) -> Result<T> {
        let body = self.send(call).await?;
        decode(inspect(&body)?)
    }

    async fn fetch_document(&self, call: EndpointCall) -> Result<Value> {
        let body = self.send(call).await?;
        document(inspect(&body)?)
    }

    /// Register reads answer plain text or `{"value": ...}`. Anything that is not a JSON
    /// string or an object carrying `value` is returned as the raw body text.
    async fn fetch_register(&self, call: EndpointCall) -> Result<String> {
        let body = self.send(call).await?;
        let raw = String::from_utf8_lossy(&body).trim().to_string();
        match inspect(&body)? {
            Payload::Empty => Ok(String::new()),
            Payload::Json(Value::String(s)) => Ok(s),
            payload @ Payload::Json(Value::Object(_)) => {
                let register: DebugRegister = decode(payload)?;
                Ok(register.into_text().unwrap_or(raw))
            }
            Payload::Json(_) | Payload::Text(..) => Ok(raw),
        }
    }
}

fn drive_path(drive: &str, action: &str) -> String {
    format!("/v1/drives/{}:{action}", segment(drive))
}

#[cfg(test)]
mod tests {
    use super::UltimateClient;
    use crate::error::ClientError;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn rejects_relative_or_non_http_base_urls() {
        for bad in [
            "192.168.0.120",
            "ftp://device",
            "not a url",
            "file:///tmp/x",
        ] {
            let err = UltimateClient::new(bad, None).unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidBaseUrl { .. }),
                "{bad} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn applies_default_timeout() {
        let client = UltimateClient::new("http://192.168.0.120", None).expect("client");
        assert_eq!(client.timeout(), Duration::from_secs(30));
        let client = UltimateClient::new("http://192.168.0.120", Some(Duration::from_secs(5)))
            .expect("client");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn close_releases_once() {
        let client = UltimateClient::new("http://192.168.0.120", None).expect("client");
        assert!(!client.is_closed());
        assert!(client.close());
        assert!(!client.close());
        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn calls_after_close_fail_without_network() {
        let client = UltimateClient::new("http://127.0.0.1:1", None).expect("client");
        client.close();
        let err = client.version().await.unwrap_err();
        assert!(matches!(err, ClientError::Closed));
    }
}
