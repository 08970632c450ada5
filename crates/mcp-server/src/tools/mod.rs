//! Tool adapter: one operation per device capability, each returning an envelope.
//!
//! Operations never fail across this boundary. Client errors, payload problems, malformed
//! arguments and panics all end up as failure envelopes.

mod basic;
mod catalog;
mod configs;
mod drives;
mod files;
mod machine;
mod memory;
mod runners;
mod streams;

pub use basic::GenerateBasicArgs;
pub use catalog::{ToolSpec, catalog};
pub use configs::{BulkConfigArgs, CategoryArgs, ConfigItemArgs, SetConfigItemArgs};
pub use drives::{
    DriveArgs, LoadDriveRomArgs, LoadDriveRomBinaryArgs, MountDiskArgs, MountDiskBinaryArgs,
    SetDriveModeArgs,
};
pub use files::{CreateD64Args, CreateDiskArgs, CreateDnpArgs, PathArgs};
pub use memory::{ReadMemoryArgs, SetDebugRegisterArgs, WriteMemoryArgs, WriteMemoryBinaryArgs};
pub use runners::{
    FileArgs, PlayModBinaryArgs, PlaySidArgs, PlaySidBinaryArgs, RunCrtBinaryArgs, RunPrgBinaryArgs,
};
pub use streams::{StartStreamArgs, StreamArgs};

use crate::envelope::{ToolFailure, ToolResult};
use crate::payload::PayloadResolver;
use futures::FutureExt as _;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use ultimate_basic::BasicCompiler;
use ultimate_client::UltimateClient;

/// Arguments of tools that take none.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// The device operations exposed as tools.
#[derive(Clone)]
pub struct UltimateTools {
    client: Arc<UltimateClient>,
    payloads: PayloadResolver,
    compiler: Arc<dyn BasicCompiler>,
}

impl UltimateTools {
    pub fn new(
        client: Arc<UltimateClient>,
        payloads: PayloadResolver,
        compiler: Arc<dyn BasicCompiler>,
    ) -> Self {
        Self {
            client,
            payloads,
            compiler,
        }
    }

    #[must_use]
    pub fn client(&self) -> &UltimateClient {
        &self.client
    }

    /// Run the named tool. Returns `None` if no tool has that name.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> Option<ToolResult> {
        let outcome = AssertUnwindSafe(self.dispatch(name, arguments))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(tool = name, "tool panicked");
                let message = format!("Internal error while running {name}");
                Err(ToolFailure::new(message))
            }
        };

        if let Err(failure) = &result {
            tracing::warn!(
                tool = name,
                error = %failure.message,
                api_errors = ?failure.api_errors,
                "tool failed"
            );
        }
        Some(result)
    }

    #[allow(clippy::too_many_lines)]
    async fn dispatch(&self, name: &str, args: Option<JsonObject>) -> Option<ToolResult> {
        let result = match name {
            "ultimate_get_connection" => self.get_connection().await,
            "ultimate_version" => self.version().await,

            "ultimate_reset_machine" => self.reset_machine().await,
            "ultimate_reboot_device" => self.reboot_device().await,
            "ultimate_pause_machine" => self.pause_machine().await,
            "ultimate_resume_machine" => self.resume_machine().await,
            "ultimate_power_off" => self.power_off().await,
            "ultimate_menu_button" => self.menu_button().await,

            "ultimate_read_memory" => with_args(args, |a| self.read_memory(a)).await,
            "ultimate_write_memory" => with_args(args, |a| self.write_memory(a)).await,
            "ultimate_write_memory_binary" => {
                with_args(args, |a| self.write_memory_binary(a)).await
            }
            "ultimate_get_debug_register" => self.get_debug_register().await,
            "ultimate_set_debug_register" => with_args(args, |a| self.set_debug_register(a)).await,

            "ultimate_play_sid" => with_args(args, |a| self.play_sid(a)).await,
            "ultimate_play_sid_binary" => with_args(args, |a| self.play_sid_binary(a)).await,
            "ultimate_play_mod" => with_args(args, |a| self.play_mod(a)).await,
            "ultimate_play_mod_binary" => with_args(args, |a| self.play_mod_binary(a)).await,
            "ultimate_load_program" => with_args(args, |a| self.load_program(a)).await,
            "ultimate_run_program" => with_args(args, |a| self.run_program(a)).await,
            "ultimate_run_prg_binary" => with_args(args, |a| self.run_prg_binary(a)).await,
            "ultimate_run_cartridge" => with_args(args, |a| self.run_cartridge(a)).await,
            "ultimate_run_crt_binary" => with_args(args, |a| self.run_crt_binary(a)).await,

            "ultimate_get_config_categories" => self.get_config_categories().await,
            "ultimate_get_config_category" => {
                with_args(args, |a| self.get_config_category(a)).await
            }
            "ultimate_get_config_item" => with_args(args, |a| self.get_config_item(a)).await,
            "ultimate_set_config_item" => with_args(args, |a| self.set_config_item(a)).await,
            "ultimate_bulk_config_update" => with_args(args, |a| self.bulk_config_update(a)).await,
            "ultimate_save_config" => self.save_config().await,
            "ultimate_load_config" => self.load_config().await,
            "ultimate_reset_config" => self.reset_config().await,

            "ultimate_get_drives" => self.get_drives().await,
            "ultimate_mount_disk" => with_args(args, |a| self.mount_disk(a)).await,
            "ultimate_mount_disk_binary" => with_args(args, |a| self.mount_disk_binary(a)).await,
            "ultimate_unmount_disk" => with_args(args, |a| self.unmount_disk(a)).await,
            "ultimate_reset_drive" => with_args(args, |a| self.reset_drive(a)).await,
            "ultimate_turn_drive_on" => with_args(args, |a| self.turn_drive_on(a)).await,
            "ultimate_turn_drive_off" => with_args(args, |a| self.turn_drive_off(a)).await,
            "ultimate_set_drive_mode" => with_args(args, |a| self.set_drive_mode(a)).await,
            "ultimate_load_drive_rom" => with_args(args, |a| self.load_drive_rom(a)).await,
            "ultimate_load_drive_rom_binary" => {
                with_args(args, |a| self.load_drive_rom_binary(a)).await
            }

            "ultimate_create_d64" => with_args(args, |a| self.create_d64(a)).await,
            "ultimate_create_d71" => with_args(args, |a| self.create_d71(a)).await,
            "ultimate_create_d81" => with_args(args, |a| self.create_d81(a)).await,
            "ultimate_create_dnp" => with_args(args, |a| self.create_dnp(a)).await,
            "ultimate_get_file_info" => with_args(args, |a| self.get_file_info(a)).await,

            "ultimate_start_stream" => with_args(args, |a| self.start_stream(a)).await,
            "ultimate_stop_stream" => with_args(args, |a| self.stop_stream(a)).await,

            "ultimate_generate_basic_prg" => with_args(args, |a| self.generate_basic_prg(a)).await,

            _ => return None,
        };
        Some(result)
    }
}

/// Parse the MCP `arguments` object into `A`. Missing arguments are an empty object.
pub fn parse_args<A: DeserializeOwned>(args: Option<JsonObject>) -> Result<A, ToolFailure> {
    serde_json::from_value(serde_json::Value::Object(args.unwrap_or_default()))
        .map_err(|e| ToolFailure::new(format!("Invalid arguments: {e}")))
}

async fn with_args<A, F, Fut>(args: Option<JsonObject>, op: F) -> ToolResult
where
    A: DeserializeOwned,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = ToolResult>,
{
    op(parse_args(args)?).await
}
