//! Record identifiers.
//!
//! CarePortal uses two kinds of identifier:
//!
//! - [`TimestampId`]: the decimal number of milliseconds since the Unix epoch at creation,
//!   e.g. `1767225600000`. Articles and appointments use these so that ids sort in creation
//!   order and read like the ids the stores have always persisted.
//! - [`EventId`]: a random UUID in canonical form (32 lowercase hex characters, no hyphens),
//!   used for notifications and medicine orders produced by the simulations.
//!
//! ## Uniqueness
//! A [`TimestampIdGenerator`] never hands out the same id twice: when the clock has not moved
//! past the previous id it bumps by one millisecond. Stores keep one generator per session.

mod service;

pub use service::{EventId, TimestampId, TimestampIdGenerator};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
