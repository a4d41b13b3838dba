//! Storage
//!
//! Adapter contract, reference implementations and the per-kind registry.

pub mod adapter;
pub mod memory;
pub mod mock;
pub mod registry;

pub use adapter::Adapter;
#[cfg(test)]
pub use adapter::MockAdapter as AutoMockAdapter;
pub use memory::InMemoryAdapter;
pub use mock::{create_mock_adapter, MockAdapter, UpsertCall};
pub use registry::AdapterRegistry;
