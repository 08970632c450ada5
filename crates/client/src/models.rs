//! Typed replies and request options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply of `GET /v1/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub errors: Vec<String>,
}

/// Reply of `GET /v1/configs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCategories {
    #[serde(default, deserialize_with = "nullable_list")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub errors: Vec<String>,
}

/// Reply of `GET /v1/drives`. Drive entries are device-defined and kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrivesInfo {
    #[serde(default, deserialize_with = "nullable_list")]
    pub drives: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub errors: Vec<String>,
}

/// Object form of a debug register reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DebugRegister {
    #[serde(default)]
    value: Option<Value>,
}

impl DebugRegister {
    /// The register as text; `None` when the reply carried no usable `value`.
    pub(crate) fn into_text(self) -> Option<String> {
        match self.value? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// Options for mounting a disk image. `None` fields are left to the device default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Image type, e.g. `d64`, `g64`, `d71`, `g71`, `d81`.
    pub image_type: Option<String>,
    /// Mount mode, e.g. `readwrite`, `readonly`, `unlinked`.
    pub mode: Option<String>,
}

/// Disk image formats the device can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskFormat {
    /// 1541 image; 35 or 40 tracks.
    D64 { tracks: u32 },
    /// 1571 image.
    D71,
    /// 1581 image.
    D81,
    /// CMD native partition image.
    Dnp { tracks: u32 },
}

impl DiskFormat {
    /// Track count used when a D64 is created without an explicit value.
    pub const DEFAULT_D64_TRACKS: u32 = 35;

    pub(crate) fn action(self) -> &'static str {
        match self {
            Self::D64 { .. } => "create_d64",
            Self::D71 => "create_d71",
            Self::D81 => "create_d81",
            Self::Dnp { .. } => "create_dnp",
        }
    }

    pub(crate) fn tracks(self) -> Option<u32> {
        match self {
            Self::D64 { tracks } | Self::Dnp { tracks } => Some(tracks),
            Self::D71 | Self::D81 => None,
        }
    }
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let list = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}
