//! Error types for the memory crate.
//!
//! Construction-time misconfiguration surfaces as
//! [`MemoryError::Configuration`]. [`MemoryError::InvariantViolation`] is a
//! defensive check for corrupted internal state; it indicates a bug and is
//! not meant to be caught and retried. Capability failures during `append`
//! are not represented here: they are absorbed by the store's degradation
//! rule (see [`crate::capability`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
