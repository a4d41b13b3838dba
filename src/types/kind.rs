//! Token Kinds
//!
//! The closed set of token kinds and the schema table that drives every
//! per-kind decision: claim whitelist, single-use support and expiration policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    AccessToken,
    AuthorizationCode,
    RefreshToken,
    ClientCredentials,
    InitialAccessToken,
    RegistrationAccessToken,
}

/// How a kind's expiration is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// `exp = iat + ttl`, where the ttl comes from server configuration.
    FixedTtl,
    /// `exp = iat + expiresIn`, where the caller must supply `expiresIn`.
    ExplicitExpiresIn,
}

/// Schema row for a token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindSchema {
    pub kind: TokenKind,
    pub allowed_claims: &'static [&'static str],
    pub supports_consumption: bool,
    pub expiration: ExpirationPolicy,
}

impl KindSchema {
    /// Check whether a claim key is whitelisted for this kind.
    pub fn allows(&self, claim: &str) -> bool {
        self.allowed_claims.contains(&claim)
    }
}

const ACCESS_TOKEN_CLAIMS: &[&str] = &[
    "accountId",
    "claims",
    "clientId",
    "grantId",
    "scope",
    "sid",
    "aud",
];

const AUTHORIZATION_CODE_CLAIMS: &[&str] = &[
    "accountId",
    "claims",
    "clientId",
    "grantId",
    "scope",
    "sid",
    "acr",
    "amr",
    "authTime",
    "nonce",
    "redirectUri",
    "codeChallenge",
    "codeChallengeMethod",
];

const REFRESH_TOKEN_CLAIMS: &[&str] = &[
    "accountId",
    "claims",
    "clientId",
    "grantId",
    "scope",
    "sid",
    "acr",
    "amr",
    "authTime",
    "nonce",
];

const CLIENT_CREDENTIALS_CLAIMS: &[&str] = &["clientId", "scope", "aud"];

const REGISTRATION_ACCESS_TOKEN_CLAIMS: &[&str] = &["clientId"];

static SCHEMAS: [KindSchema; 6] = [
    KindSchema {
        kind: TokenKind::AccessToken,
        allowed_claims: ACCESS_TOKEN_CLAIMS,
        supports_consumption: false,
        expiration: ExpirationPolicy::FixedTtl,
    },
    KindSchema {
        kind: TokenKind::AuthorizationCode,
        allowed_claims: AUTHORIZATION_CODE_CLAIMS,
        supports_consumption: true,
        expiration: ExpirationPolicy::FixedTtl,
    },
    KindSchema {
        kind: TokenKind::RefreshToken,
        allowed_claims: REFRESH_TOKEN_CLAIMS,
        supports_consumption: true,
        expiration: ExpirationPolicy::FixedTtl,
    },
    KindSchema {
        kind: TokenKind::ClientCredentials,
        allowed_claims: CLIENT_CREDENTIALS_CLAIMS,
        supports_consumption: false,
        expiration: ExpirationPolicy::FixedTtl,
    },
    KindSchema {
        kind: TokenKind::InitialAccessToken,
        allowed_claims: &[],
        supports_consumption: false,
        expiration: ExpirationPolicy::ExplicitExpiresIn,
    },
    KindSchema {
        kind: TokenKind::RegistrationAccessToken,
        allowed_claims: REGISTRATION_ACCESS_TOKEN_CLAIMS,
        supports_consumption: false,
        expiration: ExpirationPolicy::ExplicitExpiresIn,
    },
];

/// Look up the schema for a kind.
pub fn schema_for(kind: TokenKind) -> &'static KindSchema {
    // The table is ordered like the enum declaration.
    &SCHEMAS[kind as usize]
}

/// Look up the schema for a kind by its stable name.
pub fn schema_for_name(name: &str) -> Result<&'static KindSchema, ConfigurationError> {
    TokenKind::from_name(name).map(schema_for)
}

impl TokenKind {
    /// All token kinds.
    pub const ALL: [TokenKind; 6] = [
        TokenKind::AccessToken,
        TokenKind::AuthorizationCode,
        TokenKind::RefreshToken,
        TokenKind::ClientCredentials,
        TokenKind::InitialAccessToken,
        TokenKind::RegistrationAccessToken,
    ];

    /// Stable identifier used for adapter addressing and the `kind` claim.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessToken => "AccessToken",
            Self::AuthorizationCode => "AuthorizationCode",
            Self::RefreshToken => "RefreshToken",
            Self::ClientCredentials => "ClientCredentials",
            Self::InitialAccessToken => "InitialAccessToken",
            Self::RegistrationAccessToken => "RegistrationAccessToken",
        }
    }

    /// Resolve a kind from its stable identifier.
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownKind {
                name: name.to_string(),
            })
    }

    pub fn schema(&self) -> &'static KindSchema {
        schema_for(*self)
    }

    pub fn supports_consumption(&self) -> bool {
        self.schema().supports_consumption
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
