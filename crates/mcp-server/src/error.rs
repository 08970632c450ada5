//! Error types for server startup and serving.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid config YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to bind or run the HTTP listener
    #[error("Server error: {0}")]
    Serve(String),

    /// Failed to construct the device client or payload downloader
    #[error("Startup error: {0}")]
    Startup(String),
}

/// Result type alias for server setup.
pub type Result<T> = std::result::Result<T, ServerError>;
