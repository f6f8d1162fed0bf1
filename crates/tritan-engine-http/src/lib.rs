//! HTTP adapter for the Tritan workflow engine.

mod client;
mod config;

pub use client::HttpEngine;
pub use config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, EngineConfig};
