//! Token Store Types
//!
//! Core type definitions: token kinds and their schema, claims, tokens,
//! storage records and configuration.

pub mod claims;
pub mod config;
pub mod kind;
pub mod record;
pub mod token;

pub use claims::*;
pub use config::*;
pub use kind::*;
pub use record::*;
pub use token::*;
