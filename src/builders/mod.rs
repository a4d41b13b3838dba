//! Builders
//!
//! Fluent builders for token store configuration.

pub mod config;

pub use config::{provider_config, ProviderConfigBuilder};
