#![allow(dead_code)]

use anyhow::Context as _;
use rmcp::model::ClientJsonRpcMessage;
use rmcp::transport::streamable_http_client::{
    StreamableHttpClient as _, StreamableHttpPostResponse,
};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use ultimate_test_support::{KillOnDrop, pick_unused_port, wait_http_ok};

/// The server binary, running against `device_url`.
pub struct ServerProcess {
    _child: KillOnDrop,
    pub base: String,
}

impl ServerProcess {
    pub async fn spawn(device_url: &str, resources_dir: &Path) -> anyhow::Result<Self> {
        let port = pick_unused_port()?;
        let child = Command::new(env!("CARGO_BIN_EXE_ultimate-mcp-server"))
            .arg("--base-url")
            .arg(device_url)
            .arg("--bind")
            .arg(format!("127.0.0.1:{port}"))
            .arg("--resources-dir")
            .arg(resources_dir)
            .arg("--timeout-secs")
            .arg("5")
            .arg("--log-level")
            .arg("warn")
            .env_remove("ULTIMATE_MCP_CONFIG")
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("spawn ultimate-mcp-server")?;
        let child = KillOnDrop(child);

        let base = format!("http://127.0.0.1:{port}");
        wait_http_ok(&format!("{base}/health"), Duration::from_secs(20)).await?;
        Ok(Self {
            _child: child,
            base,
        })
    }

    pub fn mcp_url(&self) -> String {
        format!("{}/mcp", self.base)
    }
}

/// Minimal MCP client over streamable HTTP.
pub struct McpSession {
    client: reqwest::Client,
    uri: Arc<str>,
    session_id: Arc<str>,
}

impl McpSession {
    pub async fn connect(uri: impl Into<Arc<str>>) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let uri: Arc<str> = uri.into();

        let init: ClientJsonRpcMessage = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "ultimate-mcp-server-tests", "version": "0" }
            }
        }))
        .expect("initialize json must deserialize");

        let resp = client
            .post_message(uri.clone(), init, None, None)
            .await
            .context("POST initialize")?;
        let (_msg, session_id) = resp
            .expect_initialized::<reqwest::Error>()
            .await
            .context("expect initialize response")?;
        let session_id = session_id.context("missing Mcp-Session-Id header")?.into();

        let session = Self {
            client,
            uri,
            session_id,
        };
        session.notify_initialized().await?;
        Ok(session)
    }

    async fn notify_initialized(&self) -> anyhow::Result<()> {
        let msg: ClientJsonRpcMessage = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .expect("notification json must deserialize");

        self.client
            .post_message(self.uri.clone(), msg, Some(self.session_id.clone()), None)
            .await
            .context("POST notifications/initialized")?
            .expect_accepted::<reqwest::Error>()
            .context("expected 202 Accepted")?;
        Ok(())
    }

    pub async fn request(
        &self,
        id: u64,
        method: &str,
        params: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let msg: ClientJsonRpcMessage = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .expect("request json must deserialize");

        let resp = self
            .client
            .post_message(self.uri.clone(), msg, Some(self.session_id.clone()), None)
            .await
            .with_context(|| format!("POST {method}"))?;

        let server_msg = read_first_server_message(resp).await?;
        serde_json::to_value(server_msg).context("serialize server message to json")
    }

    /// `tools/call`, returning the parsed envelope and the `isError` flag.
    pub async fn call_tool(
        &self,
        id: u64,
        name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<(serde_json::Value, bool)> {
        let value = self
            .request(
                id,
                "tools/call",
                serde_json::json!({ "name": name, "arguments": arguments }),
            )
            .await?;
        let result = &value["result"];
        let text = result["content"][0]["text"]
            .as_str()
            .with_context(|| format!("no text content in {value}"))?;
        let envelope = serde_json::from_str(text).context("parse envelope")?;
        Ok((envelope, result["isError"].as_bool().unwrap_or(false)))
    }
}

async fn read_first_server_message(
    resp: StreamableHttpPostResponse,
) -> anyhow::Result<rmcp::model::ServerJsonRpcMessage> {
    use anyhow::bail;
    use futures::StreamExt as _;

    match resp {
        StreamableHttpPostResponse::Json(msg, ..) => Ok(msg),
        StreamableHttpPostResponse::Sse(mut stream, ..) => {
            while let Some(evt) = stream.next().await {
                let evt = evt.context("read SSE event")?;
                let payload = evt.data.unwrap_or_default();
                if payload.trim().is_empty() {
                    continue;
                }
                return serde_json::from_str(&payload).context("parse SSE data as JSON-RPC");
            }
            bail!("unexpected end of SSE stream")
        }
        StreamableHttpPostResponse::Accepted => bail!("unexpected 202 Accepted response"),
    }
}
