//! Async client for the Commodore 64 Ultimate REST API.
//!
//! [`UltimateClient`] exposes one method per device endpoint (machine control, memory access,
//! media runners, configuration, drives, data streams and file utilities) and normalizes the
//! device's two failure styles, HTTP status and in-body `errors` arrays, into [`ClientError`].

mod client;
pub mod error;
pub mod models;
mod request;
mod response;

pub use client::UltimateClient;
pub use error::{ClientError, Result};
pub use models::{ConfigCategories, DiskFormat, DrivesInfo, MountOptions, VersionInfo};
