//! Static description of every tool: name, description, input schema and annotations.

use super::{
    BulkConfigArgs, CategoryArgs, ConfigItemArgs, CreateD64Args, CreateDiskArgs, CreateDnpArgs,
    DriveArgs, FileArgs, GenerateBasicArgs, LoadDriveRomArgs, LoadDriveRomBinaryArgs, MountDiskArgs,
    MountDiskBinaryArgs, NoArgs, PathArgs, PlayModBinaryArgs, PlaySidArgs, PlaySidBinaryArgs,
    ReadMemoryArgs, RunCrtBinaryArgs, RunPrgBinaryArgs, SetConfigItemArgs, SetDebugRegisterArgs,
    SetDriveModeArgs, StartStreamArgs, StreamArgs, WriteMemoryArgs, WriteMemoryBinaryArgs,
};
use crate::annotations::{annotations_for_method, local_annotations};
use reqwest::Method;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// HTTP method of the device endpoint; `None` for tools that run locally.
    pub method: Option<Method>,
    pub input_schema: Arc<JsonObject>,
}

impl ToolSpec {
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let mut tool = Tool::new(self.name, self.description, Arc::clone(&self.input_schema));
        tool.annotations = Some(match &self.method {
            Some(method) => annotations_for_method(self.title, method),
            None => local_annotations(self.title),
        });
        tool
    }
}

fn schema_of<A: JsonSchema>() -> Arc<JsonObject> {
    let schema = serde_json::to_value(schemars::schema_for!(A)).unwrap_or(Value::Null);
    let mut obj = match schema {
        Value::Object(obj) => obj,
        _ => JsonObject::new(),
    };
    obj.remove("$schema");
    obj.remove("title");
    obj.entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    Arc::new(obj)
}

fn spec<A: JsonSchema>(
    name: &'static str,
    title: &'static str,
    method: Option<Method>,
    description: &'static str,
) -> ToolSpec {
    ToolSpec {
        name,
        title,
        description,
        method,
        input_schema: schema_of::<A>(),
    }
}

static CATALOG: LazyLock<Vec<ToolSpec>> = LazyLock::new(build);

/// Every tool the server exposes, in listing order.
#[must_use]
pub fn catalog() -> &'static [ToolSpec] {
    &CATALOG
}

#[allow(clippy::too_many_lines)]
fn build() -> Vec<ToolSpec> {
    let get = || Some(Method::GET);
    let put = || Some(Method::PUT);
    let post = || Some(Method::POST);

    vec![
        spec::<NoArgs>(
            "ultimate_get_connection",
            "Check connection",
            get(),
            "Check whether the Ultimate device is reachable and report its API version and base URL.",
        ),
        spec::<NoArgs>(
            "ultimate_version",
            "API version",
            get(),
            "Get the REST API version of the Ultimate device.",
        ),
        // machine
        spec::<NoArgs>(
            "ultimate_reset_machine",
            "Reset machine",
            put(),
            "Reset the C64. Memory contents are kept.",
        ),
        spec::<NoArgs>(
            "ultimate_reboot_device",
            "Reboot device",
            put(),
            "Reboot the Ultimate device, re-initializing its cartridge configuration.",
        ),
        spec::<NoArgs>(
            "ultimate_pause_machine",
            "Pause machine",
            put(),
            "Pause the C64 CPU by pulling the DMA line low.",
        ),
        spec::<NoArgs>(
            "ultimate_resume_machine",
            "Resume machine",
            put(),
            "Resume a paused C64.",
        ),
        spec::<NoArgs>(
            "ultimate_power_off",
            "Power off",
            put(),
            "Power off the machine (Ultimate 64 only).",
        ),
        spec::<NoArgs>(
            "ultimate_menu_button",
            "Menu button",
            put(),
            "Press the Ultimate menu button.",
        ),
        // memory
        spec::<ReadMemoryArgs>(
            "ultimate_read_memory",
            "Read memory",
            get(),
            "Read C64 memory via DMA. Returns the bytes base64 encoded. Length defaults to 256.",
        ),
        spec::<WriteMemoryArgs>(
            "ultimate_write_memory",
            "Write memory",
            put(),
            "Write hex-encoded bytes to C64 memory via DMA.",
        ),
        spec::<WriteMemoryBinaryArgs>(
            "ultimate_write_memory_binary",
            "Write memory block",
            post(),
            "Write a binary block to C64 memory. Provide exactly one of dataBase64, url or filePath.",
        ),
        spec::<NoArgs>(
            "ultimate_get_debug_register",
            "Read debug register",
            get(),
            "Read the debug register ($D7FF).",
        ),
        spec::<SetDebugRegisterArgs>(
            "ultimate_set_debug_register",
            "Write debug register",
            put(),
            "Write the debug register ($D7FF) and return the value read back.",
        ),
        // runners
        spec::<PlaySidArgs>(
            "ultimate_play_sid",
            "Play SID",
            put(),
            "Play a SID file stored on the device, optionally selecting a sub-tune.",
        ),
        spec::<PlaySidBinaryArgs>(
            "ultimate_play_sid_binary",
            "Play SID upload",
            post(),
            "Upload and play a SID file. Provide one of sidDataBase64, url or filePath.",
        ),
        spec::<FileArgs>(
            "ultimate_play_mod",
            "Play MOD",
            put(),
            "Play an Amiga MOD file stored on the device.",
        ),
        spec::<PlayModBinaryArgs>(
            "ultimate_play_mod_binary",
            "Play MOD upload",
            post(),
            "Upload and play an Amiga MOD file. Provide one of modDataBase64, url or filePath.",
        ),
        spec::<FileArgs>(
            "ultimate_load_program",
            "Load program",
            put(),
            "Load a PRG from the device filesystem into memory without running it.",
        ),
        spec::<FileArgs>(
            "ultimate_run_program",
            "Run program",
            put(),
            "Load and run a PRG from the device filesystem.",
        ),
        spec::<RunPrgBinaryArgs>(
            "ultimate_run_prg_binary",
            "Run PRG upload",
            post(),
            "Upload and run a PRG. Provide one of prgDataBase64, url or filePath.",
        ),
        spec::<FileArgs>(
            "ultimate_run_cartridge",
            "Run cartridge",
            put(),
            "Start a CRT cartridge image stored on the device.",
        ),
        spec::<RunCrtBinaryArgs>(
            "ultimate_run_crt_binary",
            "Run cartridge upload",
            post(),
            "Upload and start a CRT cartridge image. Provide one of crtDataBase64, url or filePath.",
        ),
        // configuration
        spec::<NoArgs>(
            "ultimate_get_config_categories",
            "Config categories",
            get(),
            "List the configuration categories.",
        ),
        spec::<CategoryArgs>(
            "ultimate_get_config_category",
            "Config category",
            get(),
            "Get all items of a configuration category.",
        ),
        spec::<ConfigItemArgs>(
            "ultimate_get_config_item",
            "Config item",
            get(),
            "Get one configuration item, including its allowed values.",
        ),
        spec::<SetConfigItemArgs>(
            "ultimate_set_config_item",
            "Set config item",
            put(),
            "Set one configuration item.",
        ),
        spec::<BulkConfigArgs>(
            "ultimate_bulk_config_update",
            "Bulk config update",
            post(),
            "Set several configuration items at once from an object of category -> { item -> value }.",
        ),
        spec::<NoArgs>(
            "ultimate_save_config",
            "Save config",
            put(),
            "Save the current configuration to flash.",
        ),
        spec::<NoArgs>(
            "ultimate_load_config",
            "Load config",
            put(),
            "Load the configuration from flash, discarding unsaved changes.",
        ),
        spec::<NoArgs>(
            "ultimate_reset_config",
            "Reset config",
            put(),
            "Reset the configuration to factory defaults (not saved to flash).",
        ),
        // drives
        spec::<NoArgs>(
            "ultimate_get_drives",
            "Drives",
            get(),
            "List the emulated drives with their state and mounted images.",
        ),
        spec::<MountDiskArgs>(
            "ultimate_mount_disk",
            "Mount disk",
            put(),
            "Mount a disk image from the device filesystem on a drive.",
        ),
        spec::<MountDiskBinaryArgs>(
            "ultimate_mount_disk_binary",
            "Mount disk upload",
            post(),
            "Upload and mount a disk image. Provide one of diskDataBase64, url or filePath.",
        ),
        spec::<DriveArgs>(
            "ultimate_unmount_disk",
            "Unmount disk",
            put(),
            "Remove the mounted disk image from a drive.",
        ),
        spec::<DriveArgs>(
            "ultimate_reset_drive",
            "Reset drive",
            put(),
            "Reset a drive.",
        ),
        spec::<DriveArgs>(
            "ultimate_turn_drive_on",
            "Drive on",
            put(),
            "Enable a drive.",
        ),
        spec::<DriveArgs>(
            "ultimate_turn_drive_off",
            "Drive off",
            put(),
            "Disable a drive.",
        ),
        spec::<SetDriveModeArgs>(
            "ultimate_set_drive_mode",
            "Set drive mode",
            put(),
            "Change the emulated drive type (1541, 1571 or 1581).",
        ),
        spec::<LoadDriveRomArgs>(
            "ultimate_load_drive_rom",
            "Load drive ROM",
            put(),
            "Load a drive ROM from the device filesystem (temporary until reset).",
        ),
        spec::<LoadDriveRomBinaryArgs>(
            "ultimate_load_drive_rom_binary",
            "Load drive ROM upload",
            post(),
            "Upload a drive ROM. Provide one of romDataBase64, url or filePath.",
        ),
        // files
        spec::<CreateD64Args>(
            "ultimate_create_d64",
            "Create D64",
            put(),
            "Create an empty 1541 disk image (35 or 40 tracks).",
        ),
        spec::<CreateDiskArgs>(
            "ultimate_create_d71",
            "Create D71",
            put(),
            "Create an empty 1571 disk image.",
        ),
        spec::<CreateDiskArgs>(
            "ultimate_create_d81",
            "Create D81",
            put(),
            "Create an empty 1581 disk image.",
        ),
        spec::<CreateDnpArgs>(
            "ultimate_create_dnp",
            "Create DNP",
            put(),
            "Create an empty CMD native partition image with the given number of tracks.",
        ),
        spec::<PathArgs>(
            "ultimate_get_file_info",
            "File info",
            get(),
            "Get information about a file on the device filesystem.",
        ),
        // streams
        spec::<StartStreamArgs>(
            "ultimate_start_stream",
            "Start stream",
            put(),
            "Start a video, audio or debug data stream to an IP address (Ultimate 64 only).",
        ),
        spec::<StreamArgs>(
            "ultimate_stop_stream",
            "Stop stream",
            put(),
            "Stop a data stream.",
        ),
        // local
        spec::<GenerateBasicArgs>(
            "ultimate_generate_basic_prg",
            "Generate BASIC PRG",
            None,
            "Tokenize BASIC V2 source into a PRG loading at $0801. Returns the PRG base64 encoded for ultimate_run_prg_binary.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::catalog;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_prefixed() {
        let mut seen = HashSet::new();
        for spec in catalog() {
            assert!(spec.name.starts_with("ultimate_"), "{}", spec.name);
            assert!(seen.insert(spec.name), "duplicate tool {}", spec.name);
        }
    }

    #[test]
    fn schemas_are_objects_with_camel_case_properties() {
        let read = catalog()
            .iter()
            .find(|s| s.name == "ultimate_play_sid_binary")
            .expect("tool present");
        assert_eq!(read.input_schema["type"], "object");
        let props = read.input_schema["properties"]
            .as_object()
            .expect("properties");
        for key in ["sidDataBase64", "url", "filePath", "songNumber"] {
            assert!(props.contains_key(key), "missing {key}");
        }
        assert!(!read.input_schema.contains_key("$schema"));
    }

    #[test]
    fn required_fields_follow_argument_structs() {
        let spec = catalog()
            .iter()
            .find(|s| s.name == "ultimate_set_config_item")
            .expect("tool present");
        let required: HashSet<&str> = spec.input_schema["required"]
            .as_array()
            .expect("required")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, HashSet::from(["category", "item", "value"]));
    }

    #[test]
    fn tools_carry_annotations() {
        for spec in catalog() {
            let tool = spec.to_tool();
            let annotations = tool.annotations.expect("annotations");
            assert_eq!(annotations.title.as_deref(), Some(spec.title));
            assert_eq!(annotations.open_world_hint, Some(spec.method.is_some()));
        }
    }
}
