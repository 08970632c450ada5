use async_trait::async_trait;
use base64::Engine as _;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use ultimate_basic::{BasicCompiler, BasicError};
use ultimate_client::UltimateClient;
use ultimate_mcp_server::envelope::to_envelope;
use ultimate_mcp_server::payload::PayloadResolver;
use ultimate_mcp_server::tools::{UltimateTools, catalog};
use ultimate_test_support::{DeviceState, StubDevice, StubReply, pick_unused_port, stateful_device};

/// Compiler double that returns a fixed number of bytes.
struct FixedCompiler(usize);

#[async_trait]
impl BasicCompiler for FixedCompiler {
    async fn compile(&self, _source: &str) -> Result<Vec<u8>, BasicError> {
        let mut prg = vec![0x01, 0x08];
        prg.resize(self.0, 0x00);
        Ok(prg)
    }
}

fn tools_for(base_url: &str) -> UltimateTools {
    let client = UltimateClient::new(base_url, Some(Duration::from_secs(5))).expect("client");
    UltimateTools::new(
        Arc::new(client),
        PayloadResolver::new(Duration::from_secs(5)).expect("resolver"),
        Arc::new(FixedCompiler(20)),
    )
}

fn args(value: Value) -> Option<rmcp::model::JsonObject> {
    value.as_object().cloned()
}

async fn envelope(tools: &UltimateTools, name: &str, arguments: Value) -> Value {
    let result = tools
        .call(name, args(arguments))
        .await
        .unwrap_or_else(|| panic!("{name} is not a tool"));
    to_envelope(&result)
}

#[tokio::test]
async fn read_memory_returns_base64_block() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::bytes((0..=255u8).collect())).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(
        &tools,
        "ultimate_read_memory",
        json!({"address": "D020", "length": 256}),
    )
    .await;

    assert_eq!(out["success"], true, "{out}");
    assert_eq!(out["address"], "D020");
    assert_eq!(out["length"], 256);
    let data =
        base64::engine::general_purpose::STANDARD.decode(out["data"].as_str().expect("data"))?;
    assert_eq!(data.len(), 256);

    let req = device.last_request();
    assert_eq!(req.line(), "GET /v1/machine:readmem");
    assert_eq!(req.query_param("address").as_deref(), Some("D020"));
    assert_eq!(req.query_param("length").as_deref(), Some("256"));
    Ok(())
}

#[tokio::test]
async fn read_memory_length_defaults_to_256() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::bytes(vec![0; 256])).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(&tools, "ultimate_read_memory", json!({"address": "0400"})).await;
    assert_eq!(out["success"], true, "{out}");
    assert_eq!(
        device.last_request().query_param("length").as_deref(),
        Some("256")
    );
    Ok(())
}

#[tokio::test]
async fn generate_basic_prg_reports_size_and_load_address() {
    let tools = tools_for("http://127.0.0.1:1");
    let out = envelope(
        &tools,
        "ultimate_generate_basic_prg",
        json!({"basicSource": "10 PRINT \"HELLO\"\n20 GOTO 10"}),
    )
    .await;

    assert_eq!(out["success"], true, "{out}");
    assert_eq!(out["sizeBytes"], 20);
    assert_eq!(out["loadAddress"], "0x0801");
    let prg = base64::engine::general_purpose::STANDARD
        .decode(out["prgDataBase64"].as_str().expect("prg"))
        .expect("base64");
    assert_eq!(prg.len(), 20);
    assert!(
        out["note"]
            .as_str()
            .expect("note")
            .contains("ultimate_run_prg_binary")
    );
}

#[tokio::test]
async fn blank_basic_source_is_a_syntax_error() {
    let tools = tools_for("http://127.0.0.1:1");
    let out = envelope(
        &tools,
        "ultimate_generate_basic_prg",
        json!({"basicSource": "   \n"}),
    )
    .await;

    assert_eq!(out["success"], false);
    assert_eq!(out["errorType"], "SyntaxError");
    assert_eq!(out["error"], "BASIC source cannot be empty");
}

#[tokio::test]
async fn device_errors_are_surfaced_in_the_envelope() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::json(&json!({"errors": ["Drive not found"]}))).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(&tools, "ultimate_reset_drive", json!({"drive": "z"})).await;
    assert_eq!(
        out,
        json!({"success": false, "error": "API returned errors", "errors": ["Drive not found"]})
    );
    Ok(())
}

#[tokio::test]
async fn http_failures_name_the_status() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::text("boom").with_status(500)).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(&tools, "ultimate_reset_machine", json!({})).await;
    assert_eq!(out["success"], false);
    assert_eq!(out["error"], "API error: HTTP 500");
    assert!(out.get("errors").is_none());
    Ok(())
}

#[tokio::test]
async fn undersized_payloads_never_reach_the_device() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::ok()).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(
        &tools,
        "ultimate_run_prg_binary",
        json!({"prgDataBase64": "AQ=="}),
    )
    .await;
    assert_eq!(out["success"], false);
    assert_eq!(
        out["error"],
        "PRG file is too small (must be at least 2 bytes for load address)"
    );

    let out = envelope(&tools, "ultimate_play_sid_binary", json!({})).await;
    assert_eq!(
        out["error"],
        "One of filePath, sidDataBase64, or url must be provided"
    );

    let out = envelope(
        &tools,
        "ultimate_run_crt_binary",
        json!({"crtDataBase64": base64::engine::general_purpose::STANDARD.encode([0u8; 63])}),
    )
    .await;
    assert_eq!(
        out["error"],
        "CRT file is too small (must be at least 64 bytes for header)"
    );

    assert_eq!(device.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn binary_uploads_post_octet_streams() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::ok()).await?;
    let tools = tools_for(device.base_url());

    let prg = [
        0x01u8, 0x08, 0x0b, 0x08, 0x0a, 0x00, 0x99, 0x22, 0x48, 0x22, 0x00,
    ];
    let out = envelope(
        &tools,
        "ultimate_run_prg_binary",
        json!({"prgDataBase64": base64::engine::general_purpose::STANDARD.encode(prg)}),
    )
    .await;
    assert_eq!(out["success"], true, "{out}");
    assert_eq!(out["sizeBytes"], prg.len());

    let req = device.last_request();
    assert_eq!(req.line(), "POST /v1/runners:run_prg");
    assert_eq!(
        req.content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(req.body, prg);
    Ok(())
}

#[tokio::test]
async fn malformed_arguments_are_reported() {
    let tools = tools_for("http://127.0.0.1:1");

    let out = envelope(&tools, "ultimate_read_memory", json!({})).await;
    assert_eq!(out["success"], false);
    assert!(
        out["error"]
            .as_str()
            .expect("error")
            .starts_with("Invalid arguments: "),
        "{out}"
    );

    let out = envelope(
        &tools,
        "ultimate_start_stream",
        json!({"stream": "video", "ip": "10.0.0.2", "port": "not-a-port"}),
    )
    .await;
    assert_eq!(out["success"], false);
}

#[tokio::test]
async fn unknown_tools_are_not_dispatched() {
    let tools = tools_for("http://127.0.0.1:1");
    assert!(tools.call("ultimate_teleport", None).await.is_none());
}

#[tokio::test]
async fn every_listed_tool_is_dispatched() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::ok()).await?;
    let tools = tools_for(device.base_url());

    for spec in catalog() {
        assert!(
            tools.call(spec.name, None).await.is_some(),
            "{} is listed but not dispatched",
            spec.name
        );
    }
    Ok(())
}

#[tokio::test]
async fn connection_check_reports_unreachable_device() -> anyhow::Result<()> {
    let port = pick_unused_port()?;
    let base_url = format!("http://127.0.0.1:{port}");
    let tools = tools_for(&base_url);

    let out = envelope(&tools, "ultimate_get_connection", json!({})).await;
    assert_eq!(out["success"], false);
    assert_eq!(out["connected"], false);
    assert_eq!(out["baseUrl"], format!("{base_url}/"));
    assert!(out["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn connection_check_reports_version() -> anyhow::Result<()> {
    let device = StubDevice::start(stateful_device(DeviceState::default())).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(&tools, "ultimate_get_connection", json!({})).await;
    assert_eq!(out["success"], true, "{out}");
    assert_eq!(out["connected"], true);
    assert_eq!(out["version"], "0.1");
    Ok(())
}

#[tokio::test]
async fn config_items_round_trip_through_tools() -> anyhow::Result<()> {
    let state = DeviceState::default();
    let device = StubDevice::start(stateful_device(state.clone())).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(
        &tools,
        "ultimate_set_config_item",
        json!({"category": "Drive A Settings", "item": "Drive Type", "value": "1581"}),
    )
    .await;
    assert_eq!(out["success"], true, "{out}");
    assert_eq!(
        state
            .config("Drive%20A%20Settings", "Drive%20Type")
            .as_deref(),
        Some("1581")
    );

    let out = envelope(
        &tools,
        "ultimate_get_config_item",
        json!({"category": "Drive A Settings", "item": "Drive Type"}),
    )
    .await;
    assert_eq!(out["success"], true, "{out}");
    assert!(out["config"].to_string().contains("1581"), "{out}");
    Ok(())
}

#[tokio::test]
async fn bulk_update_requires_an_object() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::ok()).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(
        &tools,
        "ultimate_bulk_config_update",
        json!({"config": [1, 2]}),
    )
    .await;
    assert_eq!(out["success"], false);
    assert_eq!(device.request_count(), 0);

    let out = envelope(
        &tools,
        "ultimate_bulk_config_update",
        json!({"config": {"Audio Mixer": {"Vol UltiSid 1": "0 dB"}}}),
    )
    .await;
    assert_eq!(out["success"], true, "{out}");
    let req = device.last_request();
    assert_eq!(req.line(), "POST /v1/configs");
    let sent: Value = serde_json::from_slice(&req.body)?;
    assert_eq!(sent["Audio Mixer"]["Vol UltiSid 1"], "0 dB");
    Ok(())
}

#[tokio::test]
async fn disk_image_tools_pick_the_format() -> anyhow::Result<()> {
    let device = StubDevice::fixed(StubReply::ok()).await?;
    let tools = tools_for(device.base_url());

    let out = envelope(
        &tools,
        "ultimate_create_d64",
        json!({"path": "/Usb0/new.d64"}),
    )
    .await;
    assert_eq!(out, json!({"success": true, "message": "D64 created"}));
    let req = device.last_request();
    assert_eq!(req.line(), "PUT /v1/files/%2FUsb0%2Fnew.d64:create_d64");
    assert_eq!(req.query, "tracks=35");

    let out = envelope(
        &tools,
        "ultimate_create_dnp",
        json!({"path": "/Usb0/w.dnp", "tracks": 12, "diskname": "WORK"}),
    )
    .await;
    assert_eq!(out["message"], "DNP created", "{out}");
    assert_eq!(device.last_request().query, "tracks=12&diskname=WORK");

    let out = envelope(
        &tools,
        "ultimate_create_dnp",
        json!({"path": "/Usb0/w.dnp"}),
    )
    .await;
    assert_eq!(out["success"], false);
    assert_eq!(device.request_count(), 2);
    Ok(())
}
