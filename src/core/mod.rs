//! Core Components
//!
//! Injectable time and identifier sources.

pub mod clock;
pub mod id;

pub use clock::*;
pub use id::*;
