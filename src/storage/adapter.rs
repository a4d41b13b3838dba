//! Adapter Contract
//!
//! Pluggable per-kind storage. One adapter instance backs one logical
//! collection (one token kind); the store addresses it by kind name.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{ConsumeOutcome, StoredRecord};

/// Storage adapter interface.
///
/// Implementations own TTL eviction and the atomicity of [`Adapter::consume`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Store or overwrite the record for `id`.
    ///
    /// When `expires_in` is set, the record must become invisible to
    /// [`Adapter::find`] once that many seconds have elapsed.
    async fn upsert(&self, id: &str, record: StoredRecord, expires_in: Option<u64>) -> StoreResult<()>;

    /// Fetch the live record for `id`.
    ///
    /// Returns `None` both for ids that never existed and for expired records.
    async fn find(&self, id: &str) -> StoreResult<Option<StoredRecord>>;

    /// Atomically mark the record for `id` as consumed.
    ///
    /// Under concurrent calls for one id, exactly one caller observes
    /// [`ConsumeOutcome::Consumed`]; every other caller observes
    /// [`ConsumeOutcome::AlreadyConsumed`].
    async fn consume(&self, id: &str) -> StoreResult<ConsumeOutcome>;

    /// Remove the record for `id` immediately. Returns whether a record was removed.
    async fn destroy(&self, id: &str) -> StoreResult<bool>;

    /// Remove every record issued under `grant_id`. Returns the number removed.
    async fn revoke_by_grant_id(&self, grant_id: &str) -> StoreResult<u64>;
}
