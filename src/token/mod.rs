//! Token Lifecycle
//!
//! Token construction, the legacy record codec and persistence through the
//! adapter registry.
//!
//! This module provides:
//!
//! - **Token Factory**: construct, save, find, consume, redeem and destroy
//! - **Legacy Format**: header/payload/signature records with a base64url JSON payload

pub mod factory;
pub mod legacy;

pub use factory::{FindOptions, TokenFactory};
pub use legacy::{decode_payload, encode_payload, LegacyFormat};
