//! Mock Adapter
//!
//! Recording adapter for tests: keeps call history and can inject failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StorageError, StoreResult, TokenStoreError};
use crate::storage::Adapter;
use crate::types::{ConsumeOutcome, StoredRecord};

/// Upsert call as seen by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsertCall {
    pub id: String,
    pub record: StoredRecord,
    pub expires_in: Option<u64>,
}

/// Mock adapter for testing.
#[derive(Default)]
pub struct MockAdapter {
    records: Mutex<HashMap<String, StoredRecord>>,
    upsert_history: Mutex<Vec<UpsertCall>>,
    find_history: Mutex<Vec<String>>,
    consume_history: Mutex<Vec<String>>,
    destroy_history: Mutex<Vec<String>>,
    next_error: Mutex<Option<TokenStoreError>>,
    should_fail: Mutex<bool>,
}

impl MockAdapter {
    /// Create new mock adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set next error to return.
    pub fn set_next_error(&self, error: TokenStoreError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Set adapter to fail all operations.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Pre-populate a record.
    pub fn add_record(&self, id: &str, record: StoredRecord) -> &Self {
        self.records.lock().unwrap().insert(id.to_string(), record);
        self
    }

    /// Get upsert history.
    pub fn get_upsert_history(&self) -> Vec<UpsertCall> {
        self.upsert_history.lock().unwrap().clone()
    }

    /// Get find history.
    pub fn get_find_history(&self) -> Vec<String> {
        self.find_history.lock().unwrap().clone()
    }

    /// Get consume history.
    pub fn get_consume_history(&self) -> Vec<String> {
        self.consume_history.lock().unwrap().clone()
    }

    /// Get destroy history.
    pub fn get_destroy_history(&self) -> Vec<String> {
        self.destroy_history.lock().unwrap().clone()
    }

    fn check_error(&self) -> StoreResult<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(StorageError::Unavailable {
                message: "Mock storage failure".to_string(),
            }
            .into());
        }

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    async fn upsert(&self, id: &str, record: StoredRecord, expires_in: Option<u64>) -> StoreResult<()> {
        self.check_error()?;

        self.upsert_history.lock().unwrap().push(UpsertCall {
            id: id.to_string(),
            record: record.clone(),
            expires_in,
        });
        self.records.lock().unwrap().insert(id.to_string(), record);
        Ok(())
    }

    async fn find(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        self.check_error()?;

        self.find_history.lock().unwrap().push(id.to_string());
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn consume(&self, id: &str) -> StoreResult<ConsumeOutcome> {
        self.check_error()?;

        self.consume_history.lock().unwrap().push(id.to_string());
        let mut records = self.records.lock().unwrap();
        Ok(match records.get_mut(id) {
            None => ConsumeOutcome::NotFound,
            Some(record) if record.is_consumed() => ConsumeOutcome::AlreadyConsumed,
            Some(record) => {
                record.consumed = Some(true);
                ConsumeOutcome::Consumed
            }
        })
    }

    async fn destroy(&self, id: &str) -> StoreResult<bool> {
        self.check_error()?;

        self.destroy_history.lock().unwrap().push(id.to_string());
        Ok(self.records.lock().unwrap().remove(id).is_some())
    }

    async fn revoke_by_grant_id(&self, grant_id: &str) -> StoreResult<u64> {
        self.check_error()?;

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| record.grant_id.as_deref() != Some(grant_id));
        Ok((before - records.len()) as u64)
    }
}

/// Create mock adapter for testing.
pub fn create_mock_adapter() -> MockAdapter {
    MockAdapter::new()
}
