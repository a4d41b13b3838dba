//! Identifier Generation
//!
//! Unguessable record identifiers (`jti`).

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default identifier entropy: 256 bits.
pub const DEFAULT_ID_BYTES: usize = 32;

/// Identifier generator interface (for dependency injection).
pub trait IdGenerator: Send + Sync {
    /// Generate a fresh identifier.
    fn generate(&self) -> String;
}

/// Identifier generator backed by the operating system CSPRNG.
pub struct DefaultIdGenerator {
    byte_length: usize,
}

impl DefaultIdGenerator {
    /// Create generator with 256 bits of entropy.
    pub fn new() -> Self {
        Self::with_bytes(DEFAULT_ID_BYTES)
    }

    /// Create generator with custom entropy.
    ///
    /// # Panics
    /// Panics if fewer than 16 bytes (128 bits) are requested.
    pub fn with_bytes(byte_length: usize) -> Self {
        assert!(
            byte_length >= 16,
            "identifier entropy must be at least 128 bits"
        );
        Self { byte_length }
    }
}

impl Default for DefaultIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for DefaultIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.byte_length];
        OsRng.fill_bytes(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
    }
}

/// Mock identifier generator for testing.
#[derive(Default)]
pub struct MockIdGenerator {
    queued: Mutex<VecDeque<String>>,
    generate_history: Mutex<Vec<String>>,
}

impl MockIdGenerator {
    /// Create new mock generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next identifier to hand out.
    pub fn push_id(&self, id: impl Into<String>) -> &Self {
        self.queued.lock().unwrap().push_back(id.into());
        self
    }

    /// Get generate history.
    pub fn get_generate_history(&self) -> Vec<String> {
        self.generate_history.lock().unwrap().clone()
    }
}

impl IdGenerator for MockIdGenerator {
    fn generate(&self) -> String {
        let id = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("mock-jti-{}", rand::random::<u64>()));
        self.generate_history.lock().unwrap().push(id.clone());
        id
    }
}
