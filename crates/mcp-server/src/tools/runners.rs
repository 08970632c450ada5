//! SID/MOD playback and program/cartridge runners.

use super::UltimateTools;
use crate::envelope::{Fields, ToolResult, message};
use crate::payload::{CRT, MOD, PRG, PayloadKind, PayloadSource, SID};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileArgs {
    /// Path on the device filesystem, e.g. "/Usb0/games/game.prg"
    pub file: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaySidArgs {
    /// Path of the SID file on the device
    pub file: String,
    /// Sub-tune to play
    #[serde(default)]
    pub song_number: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaySidBinaryArgs {
    /// SID file contents, base64 encoded
    #[serde(default)]
    pub sid_data_base64: Option<String>,
    /// URL to download the SID file from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the SID file
    #[serde(default)]
    pub file_path: Option<String>,
    /// Sub-tune to play
    #[serde(default)]
    pub song_number: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayModBinaryArgs {
    /// MOD file contents, base64 encoded
    #[serde(default)]
    pub mod_data_base64: Option<String>,
    /// URL to download the MOD file from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the MOD file
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunPrgBinaryArgs {
    /// PRG contents (load address + data), base64 encoded
    #[serde(default)]
    pub prg_data_base64: Option<String>,
    /// URL to download the PRG from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the PRG
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunCrtBinaryArgs {
    /// CRT image contents, base64 encoded
    #[serde(default)]
    pub crt_data_base64: Option<String>,
    /// URL to download the CRT image from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the CRT image
    #[serde(default)]
    pub file_path: Option<String>,
}

impl UltimateTools {
    pub async fn play_sid(&self, args: PlaySidArgs) -> ToolResult {
        tracing::info!(file = %args.file, song = ?args.song_number, "playing SID");
        self.client.play_sid(&args.file, args.song_number).await?;
        message(format!("Playing {}", args.file))
    }

    pub async fn play_sid_binary(&self, args: PlaySidBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.sid_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&SID, source).await?;
        let size = data.len();
        self.client.play_sid_binary(data, args.song_number).await?;
        uploaded(format!("Playing SID from {origin}"), size)
    }

    pub async fn play_mod(&self, args: FileArgs) -> ToolResult {
        tracing::info!(file = %args.file, "playing MOD");
        self.client.play_mod(&args.file).await?;
        message(format!("Playing {}", args.file))
    }

    pub async fn play_mod_binary(&self, args: PlayModBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.mod_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&MOD, source).await?;
        let size = data.len();
        self.client.play_mod_binary(data).await?;
        uploaded(format!("Playing MOD from {origin}"), size)
    }

    pub async fn load_program(&self, args: FileArgs) -> ToolResult {
        tracing::info!(file = %args.file, "loading program");
        self.client.load_program(&args.file).await?;
        message(format!("Loaded {}", args.file))
    }

    pub async fn run_program(&self, args: FileArgs) -> ToolResult {
        tracing::info!(file = %args.file, "running program");
        self.client.run_program(&args.file).await?;
        message(format!("Running {}", args.file))
    }

    pub async fn run_prg_binary(&self, args: RunPrgBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.prg_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&PRG, source).await?;
        let size = data.len();
        self.client.run_program_binary(data).await?;
        uploaded(format!("Running PRG from {origin}"), size)
    }

    pub async fn run_cartridge(&self, args: FileArgs) -> ToolResult {
        tracing::info!(file = %args.file, "running cartridge");
        self.client.run_cartridge(&args.file).await?;
        message(format!("Running {}", args.file))
    }

    pub async fn run_crt_binary(&self, args: RunCrtBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.crt_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&CRT, source).await?;
        let size = data.len();
        self.client.run_cartridge_binary(data).await?;
        uploaded(format!("Running cartridge from {origin}"), size)
    }

    /// Resolve an upload payload, logging where it comes from.
    pub(super) async fn resolve(
        &self,
        kind: &PayloadKind,
        source: PayloadSource<'_>,
    ) -> Result<(Vec<u8>, String), crate::envelope::ToolFailure> {
        let origin = source.origin();
        tracing::info!(kind = kind.label, origin = %origin, "resolving upload");
        let data = self.payloads.resolve(kind, source).await?;
        Ok((data, origin))
    }
}

pub(super) fn uploaded(text: String, size: usize) -> ToolResult {
    Fields::new()
        .with("message", text)
        .with("sizeBytes", size)
        .done()
}
