//! In-Memory Adapter
//!
//! Reference adapter: a mutex-guarded map with TTL eviction, atomic consume
//! and a grant index.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::core::{Clock, SystemClock};
use crate::error::{redact_id, StorageError, StoreResult};
use crate::storage::Adapter;
use crate::types::{ConsumeOutcome, StoredRecord};

struct Entry {
    record: StoredRecord,
    expires_at: Option<i64>,
}

impl Entry {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

#[derive(Default)]
struct Collection {
    entries: HashMap<String, Entry>,
    grants: HashMap<String, HashSet<String>>,
}

impl Collection {
    fn remove(&mut self, id: &str) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        if let Some(grant_id) = &entry.record.grant_id {
            if let Some(ids) = self.grants.get_mut(grant_id) {
                ids.remove(id);
                if ids.is_empty() {
                    self.grants.remove(grant_id);
                }
            }
        }
        Some(entry)
    }

    /// Live entry for `id`; an expired entry is evicted on the way.
    fn live_mut(&mut self, id: &str, now: i64) -> Option<&mut Entry> {
        if self.entries.get(id)?.is_expired(now) {
            self.remove(id);
            return None;
        }
        self.entries.get_mut(id)
    }
}

/// In-memory adapter implementation.
///
/// Expired records are evicted when they are next accessed. Records nobody
/// looks up again stay in memory until [`InMemoryAdapter::clear_expired`] runs.
pub struct InMemoryAdapter {
    name: String,
    clock: Arc<dyn Clock>,
    collection: Mutex<Collection>,
}

impl InMemoryAdapter {
    /// Create adapter for the named collection using the wall clock.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Create adapter with a custom clock.
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
            collection: Mutex::new(Collection::default()),
        }
    }

    /// Collection name (the token kind it backs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.lock()
            .map(|c| c.entries.values().filter(|e| !e.is_expired(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict expired records. Returns the number removed.
    pub fn clear_expired(&self) -> StoreResult<u32> {
        let now = self.clock.now();
        let mut collection = self.lock()?;
        let expired: Vec<String> = collection
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            collection.remove(id);
        }

        if !expired.is_empty() {
            debug!(collection = %self.name, count = expired.len(), "evicted expired records");
        }
        Ok(expired.len() as u32)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collection>> {
        self.collection.lock().map_err(|_| {
            StorageError::Unavailable {
                message: format!("{} collection lock poisoned", self.name),
            }
            .into()
        })
    }
}

#[async_trait]
impl Adapter for InMemoryAdapter {
    async fn upsert(&self, id: &str, record: StoredRecord, expires_in: Option<u64>) -> StoreResult<()> {
        let now = self.clock.now();
        let expires_at = expires_in
            .map(|secs| i64::try_from(secs).map_or(i64::MAX, |secs| now.saturating_add(secs)));
        let mut collection = self.lock()?;

        // Drop any previous grant linkage before overwriting.
        collection.remove(id);
        if let Some(grant_id) = &record.grant_id {
            collection
                .grants
                .entry(grant_id.clone())
                .or_default()
                .insert(id.to_string());
        }
        collection
            .entries
            .insert(id.to_string(), Entry { record, expires_at });

        debug!(collection = %self.name, id = %redact_id(id), ?expires_in, "upsert");
        Ok(())
    }

    async fn find(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        let now = self.clock.now();
        let mut collection = self.lock()?;
        Ok(collection.live_mut(id, now).map(|entry| entry.record.clone()))
    }

    async fn consume(&self, id: &str) -> StoreResult<ConsumeOutcome> {
        let now = self.clock.now();
        let mut collection = self.lock()?;
        let outcome = match collection.live_mut(id, now) {
            None => ConsumeOutcome::NotFound,
            Some(entry) if entry.record.is_consumed() => ConsumeOutcome::AlreadyConsumed,
            Some(entry) => {
                entry.record.consumed = Some(true);
                ConsumeOutcome::Consumed
            }
        };

        debug!(collection = %self.name, id = %redact_id(id), ?outcome, "consume");
        Ok(outcome)
    }

    async fn destroy(&self, id: &str) -> StoreResult<bool> {
        let removed = self.lock()?.remove(id).is_some();
        debug!(collection = %self.name, id = %redact_id(id), removed, "destroy");
        Ok(removed)
    }

    async fn revoke_by_grant_id(&self, grant_id: &str) -> StoreResult<u64> {
        let mut collection = self.lock()?;
        let ids = collection.grants.remove(grant_id).unwrap_or_default();
        let mut removed = 0u64;
        for id in ids {
            if collection.entries.remove(&id).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(collection = %self.name, removed, "revoked records by grant");
        }
        Ok(removed)
    }
}
