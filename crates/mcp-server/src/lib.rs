//! MCP server for the Commodore 64 Ultimate.
//!
//! Device operations are exposed as tools that return JSON envelopes, and a fixed set of C64
//! reference documents is exposed as `c64://` resources.

pub mod annotations;
pub mod config;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::{Cli, LogFormat, Settings};
pub use error::{Result, ServerError};
pub use resources::DocumentationLibrary;
pub use server::UltimateServer;
pub use tools::UltimateTools;
