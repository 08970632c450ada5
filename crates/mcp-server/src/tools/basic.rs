//! BASIC source to PRG generation.

use super::UltimateTools;
use crate::envelope::{Fields, ToolResult};
use base64::Engine as _;
use schemars::JsonSchema;
use serde::Deserialize;
use ultimate_basic::{PRG_LOAD_ADDRESS, generate_prg};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBasicArgs {
    /// BASIC V2 program text with line numbers, e.g. "10 PRINT \"HI\"\n20 GOTO 10"
    pub basic_source: String,
}

impl UltimateTools {
    pub async fn generate_basic_prg(&self, args: GenerateBasicArgs) -> ToolResult {
        tracing::info!(chars = args.basic_source.len(), "generating BASIC PRG");
        let prg = generate_prg(self.compiler.as_ref(), &args.basic_source).await?;
        tracing::info!(size = prg.len(), "generated BASIC PRG");
        Fields::new()
            .with(
                "prgDataBase64",
                base64::engine::general_purpose::STANDARD.encode(&prg),
            )
            .with("sizeBytes", prg.len())
            .with("loadAddress", format!("0x{PRG_LOAD_ADDRESS:04X}"))
            .with(
                "note",
                "Use ultimate_run_prg_binary with prgDataBase64 parameter to execute",
            )
            .done()
    }
}
