//! File information and disk image creation.

use super::UltimateTools;
use crate::envelope::{Fields, ToolResult, message};
use schemars::JsonSchema;
use serde::Deserialize;
use ultimate_client::DiskFormat;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PathArgs {
    /// Path on the device filesystem
    pub path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateD64Args {
    /// Where to create the image
    pub path: String,
    /// 35 (default) or 40
    #[serde(default)]
    pub tracks: Option<u32>,
    /// Disk name written to the directory header
    #[serde(default)]
    pub diskname: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiskArgs {
    /// Where to create the image
    pub path: String,
    /// Disk name written to the directory header
    #[serde(default)]
    pub diskname: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnpArgs {
    /// Where to create the image
    pub path: String,
    /// Number of tracks (1-255)
    pub tracks: u32,
    /// Disk name written to the directory header
    #[serde(default)]
    pub diskname: Option<String>,
}

impl UltimateTools {
    pub async fn get_file_info(&self, args: PathArgs) -> ToolResult {
        tracing::info!(path = %args.path, "getting file info");
        let info = self.client.file_info(&args.path).await?;
        Fields::new().with("info", info).done()
    }

    pub async fn create_d64(&self, args: CreateD64Args) -> ToolResult {
        let tracks = args.tracks.unwrap_or(DiskFormat::DEFAULT_D64_TRACKS);
        self.create_image(
            &args.path,
            DiskFormat::D64 { tracks },
            args.diskname.as_deref(),
            "D64",
        )
        .await
    }

    pub async fn create_d71(&self, args: CreateDiskArgs) -> ToolResult {
        self.create_image(&args.path, DiskFormat::D71, args.diskname.as_deref(), "D71")
            .await
    }

    pub async fn create_d81(&self, args: CreateDiskArgs) -> ToolResult {
        self.create_image(&args.path, DiskFormat::D81, args.diskname.as_deref(), "D81")
            .await
    }

    pub async fn create_dnp(&self, args: CreateDnpArgs) -> ToolResult {
        let format = DiskFormat::Dnp {
            tracks: args.tracks,
        };
        self.create_image(&args.path, format, args.diskname.as_deref(), "DNP")
            .await
    }

    async fn create_image(
        &self,
        path: &str,
        format: DiskFormat,
        disk_name: Option<&str>,
        label: &str,
    ) -> ToolResult {
        tracing::info!(path = %path, format = ?format, "creating disk image");
        self.client
            .create_disk_image(path, format, disk_name)
            .await?;
        message(format!("{label} created"))
    }
}
