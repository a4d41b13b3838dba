//! Configuration Builder
//!
//! Fluent builder for token store configuration.

use crate::error::{ConfigurationError, TokenStoreError};
use crate::types::{ProviderConfig, TokenFormat, TokenKind, TtlConfig};

/// Token store configuration builder.
#[derive(Default)]
pub struct ProviderConfigBuilder {
    issuer: Option<String>,
    ttl: TtlConfig,
    format: TokenFormat,
}

impl ProviderConfigBuilder {
    /// Create new configuration builder with default lifetimes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the lifetime of a fixed-policy kind, in seconds.
    ///
    /// Kinds that take an explicit `expiresIn` have no configured lifetime;
    /// setting one is ignored.
    pub fn ttl(mut self, kind: TokenKind, seconds: u64) -> Self {
        self.ttl.set(kind, seconds);
        self
    }

    /// Replace all lifetimes.
    pub fn ttls(mut self, ttl: TtlConfig) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set storage format.
    pub fn format(mut self, format: TokenFormat) -> Self {
        self.format = format;
        self
    }

    /// Configure from an existing config.
    pub fn from_config(mut self, config: ProviderConfig) -> Self {
        self.issuer = Some(config.issuer);
        self.ttl = config.ttl;
        self.format = config.format;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ProviderConfig, TokenStoreError> {
        let issuer = self.issuer.ok_or_else(|| ConfigurationError::MissingRequired {
            field: "issuer".to_string(),
        })?;

        let config = ProviderConfig {
            issuer,
            ttl: self.ttl,
            format: self.format,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Create a new configuration builder.
pub fn provider_config() -> ProviderConfigBuilder {
    ProviderConfigBuilder::new()
}
