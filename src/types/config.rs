//! Configuration Types
//!
//! Server configuration consumed by the token store.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, TokenStoreError};
use crate::types::{ExpirationPolicy, TokenKind};

/// Default access token lifetime (1 hour).
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3600;
/// Default authorization code lifetime (10 minutes).
pub const DEFAULT_AUTHORIZATION_CODE_TTL_SECS: u64 = 600;
/// Default refresh token lifetime (14 days).
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 14 * 24 * 3600;
/// Default client credentials token lifetime (10 minutes).
pub const DEFAULT_CLIENT_CREDENTIALS_TTL_SECS: u64 = 600;

/// Token store configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Issuer identifier stamped into every token as `iss`.
    pub issuer: String,
    /// Lifetimes for fixed-policy kinds.
    #[serde(default)]
    pub ttl: TtlConfig,
    /// Active storage format.
    #[serde(default)]
    pub format: TokenFormat,
}

impl ProviderConfig {
    /// Parse and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, TokenStoreError> {
        let config: ProviderConfig =
            serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.issuer.is_empty() {
            return Err(ConfigurationError::MissingRequired {
                field: "issuer".to_string(),
            });
        }

        match url::Url::parse(&self.issuer) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => {
                return Err(ConfigurationError::InvalidIssuer {
                    issuer: self.issuer.clone(),
                })
            }
        }

        for kind in TokenKind::ALL {
            match self.ttl.for_kind(kind) {
                Some(0) => {
                    return Err(ConfigurationError::InvalidConfig {
                        message: format!("ttl for {} must be greater than zero", kind),
                    })
                }
                Some(secs) if i64::try_from(secs).is_err() => {
                    return Err(ConfigurationError::InvalidConfig {
                        message: format!("ttl for {} is out of range", kind),
                    })
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Lifetimes, in seconds, for kinds with a fixed expiration policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TtlConfig {
    pub access_token: u64,
    pub authorization_code: u64,
    pub refresh_token: u64,
    pub client_credentials: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            access_token: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            authorization_code: DEFAULT_AUTHORIZATION_CODE_TTL_SECS,
            refresh_token: DEFAULT_REFRESH_TOKEN_TTL_SECS,
            client_credentials: DEFAULT_CLIENT_CREDENTIALS_TTL_SECS,
        }
    }
}

impl TtlConfig {
    /// Fixed lifetime for a kind, or `None` when the kind needs an explicit `expiresIn`.
    pub fn for_kind(&self, kind: TokenKind) -> Option<u64> {
        if kind.schema().expiration == ExpirationPolicy::ExplicitExpiresIn {
            return None;
        }
        match kind {
            TokenKind::AccessToken => Some(self.access_token),
            TokenKind::AuthorizationCode => Some(self.authorization_code),
            TokenKind::RefreshToken => Some(self.refresh_token),
            TokenKind::ClientCredentials => Some(self.client_credentials),
            TokenKind::InitialAccessToken | TokenKind::RegistrationAccessToken => None,
        }
    }

    /// Set the lifetime for a fixed-policy kind. Explicit-policy kinds are ignored.
    pub fn set(&mut self, kind: TokenKind, seconds: u64) {
        match kind {
            TokenKind::AccessToken => self.access_token = seconds,
            TokenKind::AuthorizationCode => self.authorization_code = seconds,
            TokenKind::RefreshToken => self.refresh_token = seconds,
            TokenKind::ClientCredentials => self.client_credentials = seconds,
            TokenKind::InitialAccessToken | TokenKind::RegistrationAccessToken => {}
        }
    }
}

/// Storage format selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TokenFormat {
    /// Opaque identifier backed by a header/payload/signature record.
    #[default]
    Legacy,
}
