//! # Conversation Memory
//!
//! This module provides [`ConversationMemory`], the bounded store of
//! dialogue history behind a conversation loop.
//!
//! ## ConversationMemory
//!
//! Created once per conversation session via [`ConversationMemory::builder`]
//! with a [`BoundingPolicy`] and the capabilities that policy needs. Per
//! turn, the host calls [`append`](ConversationMemory::append) with the user
//! input and the model output, then [`render`](ConversationMemory::render)
//! to obtain the context for the next model invocation.
//!
//! ## Bounding
//!
//! Enforcement runs after every append, according to the active policy.
//! Capability failures (estimation or summarization unavailable) never fail
//! an append and never lose the new turn: enforcement is skipped for that
//! call, the failure is logged via `tracing`, and the degradation is counted
//! in [`MemoryStats`]. Only those two named failure kinds are absorbed;
//! anything else is a bug and surfaces normally.
//!
//! ## Threading
//!
//! Operations take `&mut self` and there is no internal locking: one store
//! per session, externally serialized. Independent stores are independent.
//!
//! ## Example
//!
//! ```rust
//! use memory::{BoundingPolicy, ConversationMemory, HeuristicTokenEstimator};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), memory::MemoryError> {
//! let mut memory =
//!     ConversationMemory::builder(BoundingPolicy::TokenBuffer { max_token_limit: 2000 })
//!         .with_estimator(Arc::new(HeuristicTokenEstimator::new()))
//!         .build()?;
//!
//! memory.append("Hello", "Hi there!").await?;
//! let context = memory.render()?;
//! assert_eq!(context.turns.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::capability::{EstimationError, Summarizer, TokenEstimator};
use crate::context::RenderedContext;
use crate::error::MemoryError;
use crate::policy::{BoundingPolicy, StrategyKind};
use crate::types::Turn;

/// Joins the existing summary and a new condensation under `summary_buffer`.
const SUMMARY_DELIMITER: &str = "\n";

/// A bounding policy fused with the capabilities it needs. Constructed only
/// by the builder, so a live store can never be missing a capability.
#[derive(Clone)]
enum Bounding {
    Unbounded,
    Window {
        k: usize,
    },
    TokenBuffer {
        max_token_limit: usize,
        estimator: Arc<dyn TokenEstimator>,
    },
    Summary {
        summarizer: Arc<dyn Summarizer>,
    },
    SummaryBuffer {
        max_token_limit: usize,
        estimator: Arc<dyn TokenEstimator>,
        summarizer: Arc<dyn Summarizer>,
    },
}

impl std::fmt::Debug for Bounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bounding::Unbounded => f.write_str("Unbounded"),
            Bounding::Window { k } => f.debug_struct("Window").field("k", k).finish(),
            Bounding::TokenBuffer {
                max_token_limit, ..
            } => f
                .debug_struct("TokenBuffer")
                .field("max_token_limit", max_token_limit)
                .finish_non_exhaustive(),
            Bounding::Summary { .. } => f.debug_struct("Summary").finish_non_exhaustive(),
            Bounding::SummaryBuffer {
                max_token_limit, ..
            } => f
                .debug_struct("SummaryBuffer")
                .field("max_token_limit", max_token_limit)
                .finish_non_exhaustive(),
        }
    }
}

impl Bounding {
    fn kind(&self) -> StrategyKind {
        match self {
            Bounding::Unbounded => StrategyKind::Unbounded,
            Bounding::Window { .. } => StrategyKind::Window,
            Bounding::TokenBuffer { .. } => StrategyKind::TokenBuffer,
            Bounding::Summary { .. } => StrategyKind::Summary,
            Bounding::SummaryBuffer { .. } => StrategyKind::SummaryBuffer,
        }
    }
}

/// Counters for host-side observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Turns appended over the store's lifetime.
    pub turns_appended: u64,
    /// Turns removed from history by eviction or summarization.
    pub turns_evicted: u64,
    /// Successful summarizer invocations.
    pub summarizations: u64,
    /// Appends whose enforcement was skipped because a capability failed.
    pub degraded_appends: u64,
}

/// Bounded store of dialogue history for one conversation session.
#[derive(Debug)]
pub struct ConversationMemory {
    bounding: Bounding,
    history: Vec<Turn>,
    summary: Option<String>,
    stats: MemoryStats,
}

/// Builder for [`ConversationMemory`].
///
/// `build()` fails with [`MemoryError::Configuration`] when the policy
/// parameters are invalid or a required capability is missing.
pub struct ConversationMemoryBuilder {
    policy: BoundingPolicy,
    estimator: Option<Arc<dyn TokenEstimator>>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl ConversationMemoryBuilder {
    /// Creates a builder for the given policy.
    pub fn new(policy: BoundingPolicy) -> Self {
        Self {
            policy,
            estimator: None,
            summarizer: None,
        }
    }

    /// Injects the token estimator (required for `token_buffer` and
    /// `summary_buffer`).
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Injects the summarizer (required for `summary` and `summary_buffer`).
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Validates the configuration and builds the store.
    pub fn build(self) -> Result<ConversationMemory, MemoryError> {
        self.policy.validate()?;

        let kind = self.policy.kind();
        let missing = |capability: &str| {
            MemoryError::Configuration(format!("{kind} strategy requires a {capability}"))
        };

        let estimator = |estimator: Option<Arc<dyn TokenEstimator>>| {
            estimator.ok_or_else(|| missing("token estimator"))
        };
        let summarizer = |summarizer: Option<Arc<dyn Summarizer>>| {
            summarizer.ok_or_else(|| missing("summarizer"))
        };

        let bounding = match self.policy {
            BoundingPolicy::Unbounded => Bounding::Unbounded,
            BoundingPolicy::Window { k } => Bounding::Window { k },
            BoundingPolicy::TokenBuffer { max_token_limit } => Bounding::TokenBuffer {
                max_token_limit,
                estimator: estimator(self.estimator)?,
            },
            BoundingPolicy::Summary => Bounding::Summary {
                summarizer: summarizer(self.summarizer)?,
            },
            BoundingPolicy::SummaryBuffer { max_token_limit } => Bounding::SummaryBuffer {
                max_token_limit,
                estimator: estimator(self.estimator)?,
                summarizer: summarizer(self.summarizer)?,
            },
        };

        Ok(ConversationMemory {
            bounding,
            history: Vec::new(),
            summary: None,
            stats: MemoryStats::default(),
        })
    }
}

impl ConversationMemory {
    /// Starts building a store with the given bounding policy.
    pub fn builder(policy: BoundingPolicy) -> ConversationMemoryBuilder {
        ConversationMemoryBuilder::new(policy)
    }

    /// The strategy this store was built with.
    pub fn strategy(&self) -> StrategyKind {
        self.bounding.kind()
    }

    /// Surviving history turns, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The current summary of evicted turns, if any.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Lifetime counters for this store.
    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    /// Records one exchange and enforces the bounding policy.
    ///
    /// The turn is always appended; enforcement runs afterwards. When the
    /// estimator or summarizer fails, enforcement is skipped for this call,
    /// the turn stays in history unpruned, and the failure is logged and
    /// counted rather than returned. The only error this method can return
    /// is [`MemoryError::InvariantViolation`], which indicates a bug.
    #[instrument(skip(self, input, output), fields(strategy = %self.strategy()))]
    pub async fn append(
        &mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<(), MemoryError> {
        self.history.push(Turn::new(input, output));
        self.stats.turns_appended += 1;

        self.enforce().await;
        self.verify_invariants()
    }

    /// Renders the bounded context for the next model invocation.
    ///
    /// Pure projection: summary first (when present and non-empty), then the
    /// history oldest first. An empty store renders as the explicitly empty
    /// context.
    pub fn render(&self) -> Result<RenderedContext, MemoryError> {
        self.verify_invariants()?;

        Ok(RenderedContext {
            summary: self.summary.clone().filter(|s| !s.is_empty()),
            turns: self.history.clone(),
        })
    }

    /// Clears history and summary. Idempotent; used at session boundaries.
    pub fn reset(&mut self) {
        self.history.clear();
        self.summary = None;
    }

    async fn enforce(&mut self) {
        let bounding = self.bounding.clone();
        match bounding {
            Bounding::Unbounded => {}
            Bounding::Window { k } => self.enforce_window(k),
            Bounding::TokenBuffer {
                max_token_limit,
                estimator,
            } => self.enforce_token_buffer(max_token_limit, estimator.as_ref()),
            Bounding::Summary { summarizer } => self.enforce_summary(summarizer.as_ref()).await,
            Bounding::SummaryBuffer {
                max_token_limit,
                estimator,
                summarizer,
            } => {
                self.enforce_summary_buffer(max_token_limit, estimator.as_ref(), summarizer.as_ref())
                    .await
            }
        }
    }

    fn enforce_window(&mut self, k: usize) {
        if self.history.len() > k {
            let overflow = self.history.len() - k;
            self.history.drain(..overflow);
            self.stats.turns_evicted += overflow as u64;
            debug!(evicted = overflow, "window eviction");
        }
    }

    fn enforce_token_buffer(&mut self, max_token_limit: usize, estimator: &dyn TokenEstimator) {
        match eviction_count(&self.history, max_token_limit, estimator) {
            Ok(0) => {}
            Ok(evict) => {
                self.history.drain(..evict);
                self.stats.turns_evicted += evict as u64;
                debug!(evicted = evict, "token buffer eviction");
            }
            Err(err) => self.degrade(&err),
        }
    }

    async fn enforce_summary(&mut self, summarizer: &dyn Summarizer) {
        match summarizer.summarize(self.summary.as_deref(), &self.history).await {
            Ok(condensed) => {
                let condensed_turns = self.history.len();
                self.history.clear();
                self.summary = Some(condensed);
                self.stats.turns_evicted += condensed_turns as u64;
                self.stats.summarizations += 1;
                debug!(condensed_turns, "history summarized");
            }
            Err(err) => self.degrade(&err),
        }
    }

    async fn enforce_summary_buffer(
        &mut self,
        max_token_limit: usize,
        estimator: &dyn TokenEstimator,
        summarizer: &dyn Summarizer,
    ) {
        let evict = match eviction_count(&self.history, max_token_limit, estimator) {
            Ok(evict) => evict,
            Err(err) => {
                self.degrade(&err);
                return;
            }
        };
        if evict == 0 {
            return;
        }

        // History stays untouched until the condensation succeeds, so a
        // summarizer failure cannot lose the evicted batch.
        match summarizer.summarize(None, &self.history[..evict]).await {
            Ok(condensed) => {
                self.summary = Some(match self.summary.take() {
                    Some(prior) => format!("{prior}{SUMMARY_DELIMITER}{condensed}"),
                    None => condensed,
                });
                self.history.drain(..evict);
                self.stats.turns_evicted += evict as u64;
                self.stats.summarizations += 1;
                debug!(evicted = evict, "evicted turns folded into summary");
            }
            Err(err) => self.degrade(&err),
        }
    }

    fn degrade(&mut self, source: &dyn std::error::Error) {
        self.stats.degraded_appends += 1;
        warn!(
            strategy = %self.strategy(),
            error = %source,
            "capability failed; skipping enforcement, history kept unpruned"
        );
    }

    fn verify_invariants(&self) -> Result<(), MemoryError> {
        if let Bounding::Window { k } = self.bounding {
            if self.history.len() > k {
                return Err(MemoryError::InvariantViolation(format!(
                    "window of {k} holds {} turns",
                    self.history.len()
                )));
            }
        }
        Ok(())
    }
}

/// How many oldest turns must go for the estimated total to fit the limit,
/// never evicting below one surviving turn. Costs are computed up front so a
/// failing estimator leaves history untouched.
fn eviction_count(
    history: &[Turn],
    max_token_limit: usize,
    estimator: &dyn TokenEstimator,
) -> Result<usize, EstimationError> {
    let costs = history
        .iter()
        .map(|turn| estimator.estimate(&turn.render()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut total: usize = costs.iter().sum();
    let mut evict = 0;
    while total > max_token_limit && history.len() - evict > 1 {
        total -= costs[evict];
        evict += 1;
    }

    Ok(evict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::HeuristicTokenEstimator;
    use crate::capability::SummarizationError;
    use async_trait::async_trait;

    struct NoopSummarizer;

    #[async_trait]
    impl Summarizer for NoopSummarizer {
        async fn summarize(
            &self,
            _prior: Option<&str>,
            _turns: &[Turn],
        ) -> Result<String, SummarizationError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_token_buffer_requires_estimator() {
        let err = ConversationMemory::builder(BoundingPolicy::TokenBuffer { max_token_limit: 10 })
            .build()
            .unwrap_err();
        assert!(matches!(err, MemoryError::Configuration(_)));
        assert!(err.to_string().contains("token estimator"));
    }

    #[test]
    fn test_summary_requires_summarizer() {
        let err = ConversationMemory::builder(BoundingPolicy::Summary)
            .build()
            .unwrap_err();
        assert!(matches!(err, MemoryError::Configuration(_)));
        assert!(err.to_string().contains("summarizer"));
    }

    #[test]
    fn test_summary_buffer_requires_both() {
        let err =
            ConversationMemory::builder(BoundingPolicy::SummaryBuffer { max_token_limit: 10 })
                .with_summarizer(std::sync::Arc::new(NoopSummarizer))
                .build()
                .unwrap_err();
        assert!(err.to_string().contains("token estimator"));

        let err =
            ConversationMemory::builder(BoundingPolicy::SummaryBuffer { max_token_limit: 10 })
                .with_estimator(std::sync::Arc::new(HeuristicTokenEstimator::new()))
                .build()
                .unwrap_err();
        assert!(err.to_string().contains("summarizer"));
    }

    #[test]
    fn test_invalid_window_is_rejected_at_build() {
        let err = ConversationMemory::builder(BoundingPolicy::Window { k: 0 })
            .build()
            .unwrap_err();
        assert!(matches!(err, MemoryError::Configuration(_)));
    }

    #[test]
    fn test_unbounded_needs_no_capabilities() {
        let memory = ConversationMemory::builder(BoundingPolicy::Unbounded).build();
        assert!(memory.is_ok());
        assert_eq!(memory.unwrap().strategy(), StrategyKind::Unbounded);
    }

    #[test]
    fn test_eviction_count_keeps_at_least_one_turn() {
        let history = vec![Turn::new("a", "b"), Turn::new("c", "d")];

        struct Huge;
        impl TokenEstimator for Huge {
            fn estimate(&self, _text: &str) -> Result<usize, EstimationError> {
                Ok(1000)
            }
        }

        let evict = eviction_count(&history, 10, &Huge).unwrap();
        assert_eq!(evict, 1);
    }
}
