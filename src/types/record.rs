//! Storage Record Types
//!
//! The document handed to adapters and the outcome of a consume call.

use serde::{Deserialize, Serialize};

/// Legacy storage record: an encoded payload framed by opaque header and
/// signature fields, plus the adapter-visible `grantId` and `consumed` fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub header: String,
    pub payload: String,
    pub signature: String,
    /// Grant the token was issued under, for grant-wide revocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_id: Option<String>,
    /// Present only for kinds that support consumption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed: Option<bool>,
}

impl StoredRecord {
    pub fn is_consumed(&self) -> bool {
        self.consumed.unwrap_or(false)
    }
}

/// Result of an adapter's atomic consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// This call performed the `Issued -> Consumed` transition.
    Consumed,
    /// The record had already been consumed by an earlier call.
    AlreadyConsumed,
    /// No live record exists for the id.
    NotFound,
}

impl ConsumeOutcome {
    /// Whether this call was the first (and only) consumption.
    pub fn is_first(&self) -> bool {
        matches!(self, Self::Consumed)
    }
}
