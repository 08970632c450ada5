//! Version, connection check and machine control.

use super::UltimateTools;
use crate::envelope::{Fields, ToolFailure, ToolResult, message};
use serde_json::Value;

impl UltimateTools {
    pub async fn get_connection(&self) -> ToolResult {
        let base_url = self.client.base_url().to_string();
        tracing::info!(base_url = %base_url, "checking device connection");
        match self.client.version().await {
            Ok(info) => Fields::new()
                .with("connected", true)
                .with("baseUrl", base_url)
                .with("version", info.version.map_or(Value::Null, Value::from))
                .done(),
            Err(e) => Err(ToolFailure::from(e)
                .with_detail("connected", false)
                .with_detail("baseUrl", base_url)),
        }
    }

    pub async fn version(&self) -> ToolResult {
        tracing::info!("getting device version");
        let info = self.client.version().await?;
        Fields::new()
            .with("version", info.version.map_or(Value::Null, Value::from))
            .with("errors", info.errors)
            .done()
    }

    pub async fn reset_machine(&self) -> ToolResult {
        tracing::info!("resetting machine");
        self.client.reset_machine().await?;
        message("Machine reset")
    }

    pub async fn reboot_device(&self) -> ToolResult {
        tracing::info!("rebooting device");
        self.client.reboot_machine().await?;
        message("Device rebooting")
    }

    pub async fn pause_machine(&self) -> ToolResult {
        tracing::info!("pausing machine");
        self.client.pause_machine().await?;
        message("Machine paused")
    }

    pub async fn resume_machine(&self) -> ToolResult {
        tracing::info!("resuming machine");
        self.client.resume_machine().await?;
        message("Machine resumed")
    }

    pub async fn power_off(&self) -> ToolResult {
        tracing::info!("powering off machine");
        self.client.power_off_machine().await?;
        message("Powering off")
    }

    pub async fn menu_button(&self) -> ToolResult {
        tracing::info!("pressing menu button");
        self.client.press_menu_button().await?;
        message("Menu button pressed")
    }
}
