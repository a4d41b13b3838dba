//! OIDC Token Store
//!
//! Token model and persistence core for an OAuth2/OIDC authorization server.
//!
//! # Features
//!
//! - Closed set of token kinds with a single schema table (claim whitelist,
//!   single-use support, expiration policy)
//! - Token construction with issuer stamping, unguessable identifiers and
//!   expiration arithmetic
//! - Legacy storage records: opaque identifier backed by a header/payload/signature
//!   document whose payload is base64url JSON
//! - Pluggable per-kind storage adapters with atomic consume for replay detection
//! - Grant-wide revocation delegated to adapters
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oidc_token_store::{provider_config, AdapterRegistry, SystemClock, TokenFactory, TokenKind, TokenParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = provider_config().issuer("https://op.example.com").build()?;
//!     let registry = Arc::new(AdapterRegistry::in_memory(Arc::new(SystemClock)));
//!     let factory = TokenFactory::new(config, registry)?;
//!
//!     let code = factory.construct(
//!         TokenKind::AuthorizationCode,
//!         TokenParams::new()
//!             .claim("clientId", "client")
//!             .claim("grantId", "grant-1")
//!             .claim("redirectUri", "https://rp.example.com/cb"),
//!     )?;
//!     let jti = factory.save(&code).await?;
//!
//!     // Later, at the token endpoint:
//!     let redeemed = factory.redeem(TokenKind::AuthorizationCode, &jti).await?;
//!     assert!(redeemed.is_consumed());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: token kinds and schema table, claims, tokens, records, configuration
//! - `error`: error hierarchy
//! - `core`: injectable clock and identifier generator
//! - `token`: token factory and the legacy record codec
//! - `storage`: adapter contract, in-memory and mock adapters, adapter registry
//! - `builders`: fluent configuration builder

pub mod builders;
pub mod core;
pub mod error;
pub mod storage;
pub mod token;
pub mod types;

// Re-export builders
pub use builders::{provider_config, ProviderConfigBuilder};

// Re-export errors
pub use error::{ConfigurationError, StorageError, StoreResult, TokenError, TokenStoreError};

// Re-export types
pub use types::{
    // Kinds
    schema_for, schema_for_name, ExpirationPolicy, KindSchema, TokenKind,
    // Claims and tokens
    ClaimMap, Token, TokenParams,
    // Records
    ConsumeOutcome, StoredRecord,
    // Config
    ProviderConfig, TokenFormat, TtlConfig,
};

// Re-export core components
pub use crate::core::{Clock, DefaultIdGenerator, IdGenerator, MockClock, MockIdGenerator, SystemClock};

// Re-export token lifecycle
pub use token::{decode_payload, encode_payload, FindOptions, LegacyFormat, TokenFactory};

// Re-export storage
pub use storage::{create_mock_adapter, Adapter, AdapterRegistry, InMemoryAdapter, MockAdapter, UpsertCall};
