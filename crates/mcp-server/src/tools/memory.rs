//! Memory access and the debug register.

use super::UltimateTools;
use super::runners::uploaded;
use crate::envelope::{Fields, ToolResult};
use crate::payload::{MEMORY, PayloadSource};
use base64::Engine as _;
use schemars::JsonSchema;
use serde::Deserialize;

const DEFAULT_READ_LENGTH: u32 = 256;

fn default_read_length() -> u32 {
    DEFAULT_READ_LENGTH
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadMemoryArgs {
    /// Start address in hex, e.g. "D020"
    pub address: String,
    /// Number of bytes to read
    #[serde(default = "default_read_length")]
    pub length: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteMemoryArgs {
    /// Start address in hex, e.g. "0400"
    pub address: String,
    /// Bytes to write as a hex string, e.g. "0102FF"
    pub data: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteMemoryBinaryArgs {
    /// Start address in hex
    pub address: String,
    /// Bytes to write, base64 encoded
    #[serde(default)]
    pub data_base64: Option<String>,
    /// URL to download the bytes from
    #[serde(default)]
    pub url: Option<String>,
    /// Local file holding the bytes
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDebugRegisterArgs {
    /// Register value in hex
    pub value: String,
}

impl UltimateTools {
    pub async fn read_memory(&self, args: ReadMemoryArgs) -> ToolResult {
        tracing::info!(address = %args.address, length = args.length, "reading memory");
        let data = self.client.read_memory(&args.address, args.length).await?;
        Fields::new()
            .with("address", args.address)
            .with("length", args.length)
            .with(
                "data",
                base64::engine::general_purpose::STANDARD.encode(&data),
            )
            .done()
    }

    pub async fn write_memory(&self, args: WriteMemoryArgs) -> ToolResult {
        tracing::info!(address = %args.address, "writing memory");
        self.client.write_memory(&args.address, &args.data).await?;
        Fields::new()
            .with("message", "Memory written")
            .with("address", args.address)
            .done()
    }

    pub async fn write_memory_binary(&self, args: WriteMemoryBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        tracing::info!(address = %args.address, "writing memory block");
        let (data, _) = self.resolve(&MEMORY, source).await?;
        let size = data.len();
        self.client.write_memory_binary(&args.address, data).await?;
        uploaded(
            format!(
                "Successfully wrote {size} bytes to address {}",
                args.address
            ),
            size,
        )
    }

    pub async fn get_debug_register(&self) -> ToolResult {
        tracing::info!("reading debug register");
        let value = self.client.debug_register().await?;
        Fields::new().with("value", value).done()
    }

    pub async fn set_debug_register(&self, args: SetDebugRegisterArgs) -> ToolResult {
        tracing::info!(value = %args.value, "writing debug register");
        let value = self.client.set_debug_register(&args.value).await?;
        Fields::new().with("value", value).done()
    }
}
