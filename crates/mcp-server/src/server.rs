//! MCP server: tools and documentation resources over streamable HTTP.

use crate::envelope::to_call_result;
use crate::error::{Result, ServerError};
use crate::resources::DocumentationLibrary;
use crate::tools::{UltimateTools, catalog};
use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Implementation, ListResourcesResult,
        ListToolsResult, PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const SERVER_NAME: &str = "C64 Ultimate MCP Server";
pub const HEALTH_TEXT: &str = "C64 Ultimate MCP Server is running";

const INSTRUCTIONS: &str = "Controls a Commodore 64 Ultimate device through its REST API. \
Every tool returns a JSON object with a boolean `success`; failures carry `error` and, when the \
device reported them, `errors`. Binary tools accept base64 data, a URL or a local file path. \
Use ultimate_generate_basic_prg to turn BASIC source into a PRG, then ultimate_run_prg_binary \
to run it. Reference documentation is available as c64:// resources.";

#[derive(Clone)]
pub struct UltimateServer {
    tools: UltimateTools,
    docs: DocumentationLibrary,
}

impl UltimateServer {
    pub fn new(tools: UltimateTools, docs: DocumentationLibrary) -> Self {
        Self { tools, docs }
    }

    #[must_use]
    pub fn tools(&self) -> &UltimateTools {
        &self.tools
    }

    /// `/mcp` (streamable HTTP) and `/health`.
    pub fn router(self, ct: &CancellationToken) -> axum::Router {
        let http_service = StreamableHttpService::new(
            move || Ok(self.clone()),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig {
                cancellation_token: ct.child_token(),
                stateful_mode: true,
                ..Default::default()
            },
        );

        axum::Router::new()
            .route("/health", axum::routing::get(|| async { HEALTH_TEXT }))
            .nest_service("/mcp", http_service)
    }

    /// Bind `addr` and serve until `ct` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the listener fails.
    pub async fn serve_http(self, addr: SocketAddr, ct: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Serve(format!("Failed to bind to {addr}: {e}")))?;
        self.serve(listener, ct).await
    }

    /// Serve on an already bound listener until `ct` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails.
    pub async fn serve(self, listener: TcpListener, ct: CancellationToken) -> Result<()> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "listening");
        }
        let router = self.router(&ct);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { ct.cancelled().await })
            .await
            .map_err(|e| ServerError::Serve(format!("HTTP server error: {e}")))
    }
}

impl ServerHandler for UltimateServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "Control a Commodore 64 Ultimate over its REST API".to_string(),
                ),
                title: Some(SERVER_NAME.to_string()),
                icons: None,
                website_url: Some("https://ultimate64.com/".to_string()),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: catalog().iter().map(|spec| spec.to_tool()).collect(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let name: &str = &request.name;
            tracing::debug!(tool = name, "tool call");
            match self.tools.call(name, request.arguments).await {
                Some(result) => Ok(to_call_result(&result)),
                None => Err(ErrorData::invalid_params(
                    format!("Unknown tool: {name}"),
                    None,
                )),
            }
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListResourcesResult, ErrorData>> + Send + '_ {
        async move {
            Ok(ListResourcesResult {
                resources: self.docs.list(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ReadResourceResult, ErrorData>> + Send + '_ {
        async move {
            self.docs.read(&request.uri).await.ok_or_else(|| {
                ErrorData::resource_not_found(format!("Unknown resource: {}", request.uri), None)
            })
        }
    }
}
