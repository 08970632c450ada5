use anyhow::Context as _;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use ultimate_basic::ExternalTokenizer;
use ultimate_client::UltimateClient;
use ultimate_mcp_server::payload::PayloadResolver;
use ultimate_mcp_server::{
    Cli, DocumentationLibrary, LogFormat, ServerError, Settings, UltimateServer, UltimateTools,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let settings = Settings::resolve(&cli).context("failed to resolve configuration")?;
    tracing::info!(
        base_url = %settings.base_url,
        bind = %settings.bind,
        resources_dir = %settings.resources_dir.display(),
        basic_compiler = %settings.basic_compiler,
        "starting C64 Ultimate MCP server"
    );

    let client = Arc::new(
        UltimateClient::new(&settings.base_url, Some(settings.timeout))
            .map_err(|e| ServerError::Startup(e.to_string()))?,
    );
    let payloads = PayloadResolver::new(settings.timeout)
        .map_err(|e| ServerError::Startup(format!("failed to build download client: {e}")))?;
    let compiler = ExternalTokenizer::petcat_compatible(&settings.basic_compiler);

    let tools = UltimateTools::new(client.clone(), payloads, Arc::new(compiler));
    let docs = DocumentationLibrary::new(&settings.resources_dir);
    if !docs.root().is_dir() {
        tracing::warn!(
            path = %docs.root().display(),
            "documentation directory not found; resources will report missing files"
        );
    }

    let ct = CancellationToken::new();
    let shutdown = ct.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
        }
        shutdown.cancel();
    });

    let served = UltimateServer::new(tools, docs)
        .serve_http(settings.bind, ct)
        .await;

    client.close();
    tracing::info!("stopped");
    served?;
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
