//! Clock
//!
//! Time source for issuance and expiry arithmetic (epoch seconds).

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock interface (for dependency injection).
pub trait Clock: Send + Sync {
    /// Current time in epoch seconds.
    fn now(&self) -> i64;
}

/// Wall clock implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for testing.
#[derive(Debug, Default)]
pub struct MockClock {
    now: AtomicI64,
}

impl MockClock {
    /// Create mock clock fixed at `now`.
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Set the current time.
    pub fn set(&self, now: i64) -> &Self {
        self.now.store(now, Ordering::SeqCst);
        self
    }

    /// Move the clock forward.
    pub fn advance(&self, seconds: i64) -> &Self {
        self.now.fetch_add(seconds, Ordering::SeqCst);
        self
    }
}

impl Clock for MockClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
