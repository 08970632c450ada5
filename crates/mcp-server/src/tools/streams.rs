//! Video, audio and debug data streams.

use super::UltimateTools;
use crate::envelope::{ToolResult, message};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartStreamArgs {
    /// Stream name: video, audio or debug
    pub stream: String,
    /// Destination IP address
    pub ip: String,
    /// Destination UDP port; the device default is used when omitted
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamArgs {
    /// Stream name: video, audio or debug
    pub stream: String,
}

impl UltimateTools {
    pub async fn start_stream(&self, args: StartStreamArgs) -> ToolResult {
        tracing::info!(stream = %args.stream, ip = %args.ip, port = ?args.port, "starting stream");
        self.client
            .start_stream(&args.stream, &args.ip, args.port)
            .await?;
        message(format!("Stream {} started", args.stream))
    }

    pub async fn stop_stream(&self, args: StreamArgs) -> ToolResult {
        tracing::info!(stream = %args.stream, "stopping stream");
        self.client.stop_stream(&args.stream).await?;
        message(format!("Stream {} stopped", args.stream))
    }
}
