//! Adapter Registry
//!
//! Explicit kind-to-adapter mapping, built once at startup and shared by
//! reference with the token factory and redemption paths.

use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::core::Clock;
use crate::error::{ConfigurationError, StoreResult};
use crate::storage::{Adapter, InMemoryAdapter};
use crate::types::TokenKind;

/// Registry of per-kind adapters.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<TokenKind, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with one adapter per kind, built from its kind name.
    pub fn from_factory<F>(mut factory: F) -> Self
    where
        F: FnMut(&'static str) -> Arc<dyn Adapter>,
    {
        let adapters = TokenKind::ALL
            .iter()
            .map(|kind| (*kind, factory(kind.name())))
            .collect();
        Self { adapters }
    }

    /// Create a registry of in-memory adapters sharing one clock.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::from_factory(|name| Arc::new(InMemoryAdapter::with_clock(name, clock.clone())))
    }

    /// Register (or replace) the adapter for a kind.
    pub fn register(mut self, kind: TokenKind, adapter: Arc<dyn Adapter>) -> Self {
        self.adapters.insert(kind, adapter);
        self
    }

    /// Adapter for a kind.
    pub fn for_kind(&self, kind: TokenKind) -> Result<&Arc<dyn Adapter>, ConfigurationError> {
        self.adapters
            .get(&kind)
            .ok_or_else(|| ConfigurationError::AdapterNotRegistered {
                kind: kind.name().to_string(),
            })
    }

    /// Adapter addressed by kind name.
    pub fn for_name(&self, name: &str) -> Result<&Arc<dyn Adapter>, ConfigurationError> {
        self.for_kind(TokenKind::from_name(name)?)
    }

    /// Kinds with a registered adapter.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.adapters.keys().copied().collect()
    }

    /// Ask every registered adapter to drop the records of a grant.
    ///
    /// Removal itself is the adapters' job; this only fans the call out and
    /// sums the counts.
    pub async fn revoke_grant(&self, grant_id: &str) -> StoreResult<u64> {
        let counts = try_join_all(
            self.adapters
                .values()
                .map(|adapter| adapter.revoke_by_grant_id(grant_id)),
        )
        .await?;

        let removed: u64 = counts.iter().sum();
        info!(removed, "grant revoked");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockClock;
    use crate::storage::MockAdapter;
    use crate::types::StoredRecord;

    fn record(grant_id: &str) -> StoredRecord {
        StoredRecord {
            header: "h".to_string(),
            payload: "p".to_string(),
            signature: String::new(),
            grant_id: Some(grant_id.to_string()),
            consumed: None,
        }
    }

    #[test]
    fn test_from_factory_covers_all_kinds() {
        let mut names = Vec::new();
        let registry = AdapterRegistry::from_factory(|name| {
            names.push(name);
            Arc::new(MockAdapter::new())
        });

        assert_eq!(registry.kinds(), TokenKind::ALL.to_vec());
        assert!(names.contains(&"RegistrationAccessToken"));
    }

    #[test]
    fn test_missing_adapter_is_configuration_error() {
        let registry = AdapterRegistry::new().register(TokenKind::AccessToken, Arc::new(MockAdapter::new()));

        assert!(registry.for_kind(TokenKind::AccessToken).is_ok());
        assert!(matches!(
            registry.for_kind(TokenKind::RefreshToken),
            Err(ConfigurationError::AdapterNotRegistered { .. })
        ));
        assert!(matches!(
            registry.for_name("DeviceCode"),
            Err(ConfigurationError::UnknownKind { .. })
        ));
    }

    #[tokio::test]
    async fn test_revoke_grant_fans_out() {
        let registry = AdapterRegistry::in_memory(Arc::new(MockClock::new(0)));

        for kind in [TokenKind::AccessToken, TokenKind::RefreshToken, TokenKind::AuthorizationCode] {
            registry
                .for_kind(kind)
                .unwrap()
                .upsert("id", record("grant"), None)
                .await
                .unwrap();
        }
        registry
            .for_kind(TokenKind::AccessToken)
            .unwrap()
            .upsert("other", record("other-grant"), None)
            .await
            .unwrap();

        assert_eq!(registry.revoke_grant("grant").await.unwrap(), 3);
        assert!(registry
            .for_kind(TokenKind::AccessToken)
            .unwrap()
            .find("other")
            .await
            .unwrap()
            .is_some());
    }
}
