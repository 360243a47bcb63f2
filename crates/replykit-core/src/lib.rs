//! ReplyKit Core
//!
//! Types and utilities shared across ReplyKit components.
//!
//! This crate provides:
//! - Error types and result handling
//! - The non-cryptographic text fingerprint callers use to key UI state

pub mod error;
pub mod fingerprint;

pub use error::{Error, Result};
pub use fingerprint::fingerprint;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fingerprint::fingerprint;
}
