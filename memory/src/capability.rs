//! # Capabilities
//!
//! This module defines the two injected capabilities the store calls but
//! does not implement: token counting and summarization. The host supplies
//! implementations at construction time; the store imposes no timeout and
//! performs no retries of its own.
//!
//! Both capabilities are allowed to fail. Their failures are recovered
//! locally inside `append` (enforcement is skipped for that call and the
//! turn is kept unpruned) rather than propagated, because losing a memory
//! update is worse than losing exact budget enforcement for one turn.
//!
//! ## Example
//!
//! ```rust
//! use memory::{EstimationError, TokenEstimator};
//!
//! struct WordCount;
//!
//! impl TokenEstimator for WordCount {
//!     fn estimate(&self, text: &str) -> Result<usize, EstimationError> {
//!         Ok(text.split_whitespace().count().max(1))
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Turn;

/// Raised by a [`TokenEstimator`] when a cost cannot be computed, e.g. an
/// unknown model name for a tokenizer-backed implementation.
#[derive(Error, Debug, Clone)]
#[error("Estimation unavailable: {0}")]
pub struct EstimationError(String);

impl EstimationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raised by a [`Summarizer`] when a condensation cannot be produced.
#[derive(Error, Debug, Clone)]
#[error("Summarization unavailable: {0}")]
pub struct SummarizationError(String);

impl SummarizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Maps text to an integer cost. The contract only requires a non-negative
/// cost; the unit (tokens, words, bytes) is the host's choice as long as it
/// is consistent with the configured `max_token_limit`.
pub trait TokenEstimator: Send + Sync {
    /// Estimates the cost of `text`.
    fn estimate(&self, text: &str) -> Result<usize, EstimationError>;
}

/// Condenses an ordered sequence of turns into a single text.
///
/// `prior` carries the existing summary, if any, so implementations can
/// summarize progressively (fold new lines into the previous condensation).
/// Implementations typically call out to a hosted model; that network
/// latency belongs to the host, not to the store.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produces a condensed text covering `turns`, oldest first.
    async fn summarize(
        &self,
        prior: Option<&str>,
        turns: &[Turn],
    ) -> Result<String, SummarizationError>;
}
