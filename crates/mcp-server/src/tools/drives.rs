//! Floppy drive emulation.

use super::UltimateTools;
use super::runners::uploaded;
use crate::envelope::{Fields, ToolResult, message};
use crate::payload::{DISK_IMAGE, DRIVE_ROM, PayloadSource};
use schemars::JsonSchema;
use serde::Deserialize;
use ultimate_client::MountOptions;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveArgs {
    /// Drive identifier, e.g. "a" or "b"
    pub drive: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MountDiskArgs {
    pub drive: String,
    /// Image path on the device filesystem
    pub file: String,
    /// Image type: d64, g64, d71, g71 or d81
    #[serde(default, rename = "type")]
    pub image_type: Option<String>,
    /// Mount mode: readwrite, readonly or unlinked
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MountDiskBinaryArgs {
    pub drive: String,
    /// Disk image contents, base64 encoded
    #[serde(default)]
    pub disk_data_base64: Option<String>,
    /// URL to download the image from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the image
    #[serde(default)]
    pub file_path: Option<String>,
    /// Image type: d64, g64, d71, g71 or d81
    #[serde(default, rename = "type")]
    pub image_type: Option<String>,
    /// Mount mode: readwrite, readonly or unlinked
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDriveModeArgs {
    pub drive: String,
    /// Drive type: 1541, 1571 or 1581
    pub mode: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadDriveRomArgs {
    pub drive: String,
    /// ROM path on the device filesystem
    pub file: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadDriveRomBinaryArgs {
    pub drive: String,
    /// ROM contents, base64 encoded
    #[serde(default)]
    pub rom_data_base64: Option<String>,
    /// URL to download the ROM from
    #[serde(default)]
    pub url: Option<String>,
    /// Local path of the ROM
    #[serde(default)]
    pub file_path: Option<String>,
}

impl UltimateTools {
    pub async fn get_drives(&self) -> ToolResult {
        tracing::info!("listing drives");
        let info = self.client.drives().await?;
        Fields::new()
            .with("drives", info.drives)
            .with("errors", info.errors)
            .done()
    }

    pub async fn mount_disk(&self, args: MountDiskArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, file = %args.file, "mounting disk");
        let options = MountOptions {
            image_type: args.image_type,
            mode: args.mode,
        };
        self.client
            .mount_disk(&args.drive, &args.file, &options)
            .await?;
        message(format!("Disk mounted on {}", args.drive))
    }

    pub async fn mount_disk_binary(&self, args: MountDiskBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.disk_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&DISK_IMAGE, source).await?;
        let size = data.len();
        let options = MountOptions {
            image_type: args.image_type,
            mode: args.mode,
        };
        self.client
            .mount_disk_binary(&args.drive, data, &options)
            .await?;
        uploaded(
            format!("Disk from {origin} mounted on {}", args.drive),
            size,
        )
    }

    pub async fn unmount_disk(&self, args: DriveArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, "unmounting disk");
        self.client.unmount_disk(&args.drive).await?;
        message(format!("Disk unmounted from {}", args.drive))
    }

    pub async fn reset_drive(&self, args: DriveArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, "resetting drive");
        self.client.reset_drive(&args.drive).await?;
        message(format!("Drive {} reset", args.drive))
    }

    pub async fn turn_drive_on(&self, args: DriveArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, "enabling drive");
        self.client.enable_drive(&args.drive).await?;
        message(format!("Drive {} enabled", args.drive))
    }

    pub async fn turn_drive_off(&self, args: DriveArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, "disabling drive");
        self.client.disable_drive(&args.drive).await?;
        message(format!("Drive {} disabled", args.drive))
    }

    pub async fn set_drive_mode(&self, args: SetDriveModeArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, mode = %args.mode, "setting drive mode");
        self.client.set_drive_mode(&args.drive, &args.mode).await?;
        message(format!("Drive {} mode set to {}", args.drive, args.mode))
    }

    pub async fn load_drive_rom(&self, args: LoadDriveRomArgs) -> ToolResult {
        tracing::info!(drive = %args.drive, file = %args.file, "loading drive ROM");
        self.client.load_drive_rom(&args.drive, &args.file).await?;
        message(format!("ROM loaded for drive {}", args.drive))
    }

    pub async fn load_drive_rom_binary(&self, args: LoadDriveRomBinaryArgs) -> ToolResult {
        let source = PayloadSource {
            inline: args.rom_data_base64.as_deref(),
            url: args.url.as_deref(),
            file_path: args.file_path.as_deref(),
        };
        let (data, origin) = self.resolve(&DRIVE_ROM, source).await?;
        let size = data.len();
        self.client.load_drive_rom_binary(&args.drive, data).await?;
        uploaded(
            format!("ROM from {origin} loaded for drive {}", args.drive),
            size,
        )
    }
}
