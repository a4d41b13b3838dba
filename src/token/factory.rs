//! Token Factory
//!
//! Builds token instances from caller claims and moves them through the
//! per-kind adapters: save, find, consume, destroy.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{Clock, DefaultIdGenerator, IdGenerator, SystemClock};
use crate::error::{redact_id, ConfigurationError, StoreResult, TokenError, TokenStoreError};
use crate::storage::{Adapter, AdapterRegistry};
use crate::token::LegacyFormat;
use crate::types::{
    ClaimMap, ConsumeOutcome, ExpirationPolicy, ProviderConfig, Token, TokenKind, TokenParams,
    GRANT_ID_CLAIM,
};

/// Options for [`TokenFactory::find_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FindOptions {
    /// Return tokens whose `exp` has passed but which the adapter still holds.
    pub ignore_expiration: bool,
}

/// Token factory and persistence entry point.
pub struct TokenFactory {
    config: Arc<ProviderConfig>,
    registry: Arc<AdapterRegistry>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    format: LegacyFormat,
}

impl TokenFactory {
    /// Create a factory with the wall clock and the OS random identifier source.
    pub fn new(config: ProviderConfig, registry: Arc<AdapterRegistry>) -> StoreResult<Self> {
        Self::with_components(
            config,
            registry,
            Arc::new(SystemClock),
            Arc::new(DefaultIdGenerator::new()),
        )
    }

    /// Create a factory with custom time and identifier sources.
    pub fn with_components(
        config: ProviderConfig,
        registry: Arc<AdapterRegistry>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            registry,
            clock,
            ids,
            format: LegacyFormat,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Build a token of `kind` from caller-supplied parameters.
    ///
    /// Claims outside the kind's whitelist are dropped. No I/O happens here.
    pub fn construct(&self, kind: TokenKind, params: impl Into<TokenParams>) -> StoreResult<Token> {
        let params = params.into();
        let schema = kind.schema();

        let ttl = match schema.expiration {
            ExpirationPolicy::FixedTtl => self
                .config
                .ttl
                .for_kind(kind)
                .and_then(|secs| i64::try_from(secs).ok())
                .ok_or_else(|| ConfigurationError::InvalidConfig {
                    message: format!("no usable ttl configured for {}", kind),
                })?,
            ExpirationPolicy::ExplicitExpiresIn => match params.expires_in {
                None => {
                    return Err(TokenError::MissingExpiresIn {
                        kind: kind.name().to_string(),
                    }
                    .into())
                }
                Some(0) => {
                    return Err(TokenError::InvalidExpiresIn {
                        kind: kind.name().to_string(),
                    }
                    .into())
                }
                Some(seconds) => {
                    i64::try_from(seconds).map_err(|_| TokenError::InvalidExpiresIn {
                        kind: kind.name().to_string(),
                    })?
                }
            },
        };

        let claims: ClaimMap = params
            .claims
            .into_iter()
            .filter(|(key, _)| schema.allows(key))
            .collect();

        // The record-level grant index only works with string grant ids.
        if claims
            .get(GRANT_ID_CLAIM)
            .is_some_and(|grant_id| !grant_id.is_string())
        {
            return Err(TokenError::InvalidClaim {
                kind: kind.name().to_string(),
                claim: GRANT_ID_CLAIM.to_string(),
            }
            .into());
        }

        let iat = self.clock.now();
        let exp = iat.saturating_add(ttl);
        let token = Token::new(
            kind,
            self.ids.generate(),
            iat,
            exp,
            self.config.issuer.clone(),
            claims,
        );

        debug!(kind = %kind, ttl, "token constructed");
        Ok(token)
    }

    /// Persist a token. Returns its `jti`.
    ///
    /// Saving the same instance again overwrites the stored record.
    pub async fn save(&self, token: &Token) -> StoreResult<String> {
        let adapter = self.adapter(token.kind())?;
        let record = self.format.encode(token)?;
        let expires_in = token.remaining_ttl(self.clock.now());

        adapter.upsert(token.jti(), record, Some(expires_in)).await?;

        info!(kind = %token.kind(), jti = %redact_id(token.jti()), expires_in, "token saved");
        Ok(token.jti().to_string())
    }

    /// Fetch a live token of `kind` by `jti`.
    pub async fn find(&self, kind: TokenKind, jti: &str) -> StoreResult<Option<Token>> {
        self.find_with(kind, jti, FindOptions::default()).await
    }

    /// Fetch a token of `kind` by `jti` with explicit options.
    ///
    /// A record that exists but cannot be decoded is reported as
    /// [`crate::StorageError::CorruptedData`], never as `None`.
    pub async fn find_with(
        &self,
        kind: TokenKind,
        jti: &str,
        options: FindOptions,
    ) -> StoreResult<Option<Token>> {
        let adapter = self.adapter(kind)?;
        let record = match adapter.find(jti).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        let token = self.format.decode(jti, kind, &record).map_err(|e| {
            warn!(kind = %kind, jti = %redact_id(jti), error = %e, "corrupt token record");
            TokenStoreError::from(e)
        })?;

        if !options.ignore_expiration && token.is_expired_at(self.clock.now()) {
            debug!(kind = %kind, jti = %redact_id(jti), "token expired");
            return Ok(None);
        }

        Ok(Some(token))
    }

    /// Atomically mark a single-use token as consumed.
    ///
    /// The outcome tells the caller whether this call performed the transition.
    pub async fn consume(&self, kind: TokenKind, jti: &str) -> StoreResult<ConsumeOutcome> {
        if !kind.supports_consumption() {
            return Err(TokenError::ConsumptionUnsupported {
                kind: kind.name().to_string(),
            }
            .into());
        }

        let outcome = self.adapter(kind)?.consume(jti).await?;
        match outcome {
            ConsumeOutcome::Consumed => {
                info!(kind = %kind, jti = %redact_id(jti), "token consumed")
            }
            ConsumeOutcome::AlreadyConsumed => {
                warn!(kind = %kind, jti = %redact_id(jti), "token replay detected")
            }
            ConsumeOutcome::NotFound => {
                debug!(kind = %kind, jti = %redact_id(jti), "consume on missing token")
            }
        }
        Ok(outcome)
    }

    /// Find and consume a single-use token in one step.
    ///
    /// Fails with [`TokenError::NotFound`] when no live token exists and with
    /// [`TokenError::AlreadyConsumed`] when the token was redeemed before.
    pub async fn redeem(&self, kind: TokenKind, jti: &str) -> StoreResult<Token> {
        let not_found = || TokenError::NotFound {
            kind: kind.name().to_string(),
            jti: redact_id(jti),
        };

        let mut token = self.find(kind, jti).await?.ok_or_else(not_found)?;
        match self.consume(kind, jti).await? {
            ConsumeOutcome::Consumed => {
                token.set_consumed(true);
                Ok(token)
            }
            ConsumeOutcome::AlreadyConsumed => Err(TokenError::AlreadyConsumed {
                jti: redact_id(jti),
            }
            .into()),
            ConsumeOutcome::NotFound => Err(not_found().into()),
        }
    }

    /// Remove a token immediately. Returns whether a record was removed.
    pub async fn destroy(&self, kind: TokenKind, jti: &str) -> StoreResult<bool> {
        let removed = self.adapter(kind)?.destroy(jti).await?;
        info!(kind = %kind, jti = %redact_id(jti), removed, "token destroyed");
        Ok(removed)
    }

    /// Ask every adapter to drop the tokens issued under `grant_id`.
    pub async fn revoke_grant(&self, grant_id: &str) -> StoreResult<u64> {
        self.registry.revoke_grant(grant_id).await
    }

    fn adapter(&self, kind: TokenKind) -> Result<&Arc<dyn Adapter>, ConfigurationError> {
        self.registry.for_kind(kind)
    }
}
