//! Server configuration for askdb.
//!
//! Loaded from a TOML file, then environment overrides, then
//! validation. Missing sections fall back to serde defaults so a
//! minimal `config.toml` is enough to boot a development server.

pub mod config;

pub use config::ServerConfig;
