//! Command line, environment and YAML configuration.
//!
//! Precedence is CLI flag / environment variable, then the YAML file, then built-in defaults.

use crate::error::{Result, ServerError};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://192.168.0.120";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BASIC_COMPILER: &str = "petcat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "ultimate-mcp-server",
    version,
    about = "MCP server for the Commodore 64 Ultimate REST API"
)]
pub struct Cli {
    /// Optional YAML config file
    #[arg(long, env = "ULTIMATE_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Device base URL, e.g. http://192.168.0.120
    #[arg(long, env = "ULTIMATE_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout for device calls and payload downloads
    #[arg(long, env = "ULTIMATE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Address to serve MCP (`/mcp`) and health (`/health`) on
    #[arg(long, env = "ULTIMATE_MCP_BIND")]
    pub bind: Option<SocketAddr>,

    /// Root of the documentation resources
    #[arg(long, env = "ULTIMATE_RESOURCES_DIR")]
    pub resources_dir: Option<PathBuf>,

    /// BASIC tokenizer program (petcat-compatible command line)
    #[arg(long, env = "ULTIMATE_BASIC_COMPILER")]
    pub basic_compiler: Option<String>,

    /// Log filter (tracing EnvFilter syntax)
    #[arg(long, env = "ULTIMATE_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "ULTIMATE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub ultimate: UltimateSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub resources: ResourcesSection,
    #[serde(default)]
    pub basic: BasicSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UltimateSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourcesSection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BasicSection {
    pub compiler: Option<String>,
}

impl FileConfig {
    /// Load a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config YAML.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config file");
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parse YAML config text. An empty document is the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config YAML.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub bind: SocketAddr,
    pub resources_dir: PathBuf,
    pub basic_compiler: String,
}

impl Settings {
    /// Resolve settings from the command line and, if given, the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid or a resolved value is out of range.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let base_url = cli
            .base_url
            .clone()
            .or(file.ultimate.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = cli
            .timeout_secs
            .or(file.ultimate.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ServerError::Config(
                "timeoutSecs must be greater than zero".to_string(),
            ));
        }

        let bind = match (cli.bind, file.server.bind) {
            (Some(addr), _) => addr,
            (None, Some(raw)) => raw
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid server.bind '{raw}': {e}")))?,
            (None, None) => DEFAULT_BIND
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid default bind: {e}")))?,
        };

        let resources_dir = cli
            .resources_dir
            .clone()
            .or(file.resources.dir)
            .unwrap_or_else(default_resources_dir);

        let basic_compiler = cli
            .basic_compiler
            .clone()
            .or(file.basic.compiler)
            .unwrap_or_else(|| DEFAULT_BASIC_COMPILER.to_string());

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            bind,
            resources_dir,
            basic_compiler,
        })
    }
}

/// `<executable dir>/resources/data`, or `resources/data` relative to the working directory.
#[must_use]
pub fn default_resources_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join("resources")
        .join("data")
}
