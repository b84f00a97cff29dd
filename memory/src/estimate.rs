//! # Token Estimation
//!
//! Heuristic token estimation plus a fallback combinator for hosts whose
//! primary token counter is unreliable (e.g. a tokenizer that does not know
//! a custom deployment name).

use std::sync::Arc;

use tracing::warn;

use crate::capability::{EstimationError, TokenEstimator};

/// Estimates the token count for a text string.
///
/// This is a rough approximation: 1 token ≈ 4 characters for English text.
/// For production use with precise token limits, use a tokenizer-backed
/// [`TokenEstimator`] and keep this as the fallback.
pub fn estimate_tokens(text: &str) -> usize {
    ((text.len() as f64) / 4.0).ceil().max(1.0) as usize
}

/// Estimator backed by [`estimate_tokens`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenEstimator;

impl HeuristicTokenEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenEstimator for HeuristicTokenEstimator {
    fn estimate(&self, text: &str) -> Result<usize, EstimationError> {
        Ok(estimate_tokens(text))
    }
}

/// Wraps a primary estimator and falls back to the character heuristic when
/// the primary signals that estimation is unavailable. The fallback itself
/// never fails, so this estimator never fails either.
#[derive(Clone)]
pub struct FallbackTokenEstimator {
    primary: Arc<dyn TokenEstimator>,
}

impl FallbackTokenEstimator {
    pub fn new(primary: Arc<dyn TokenEstimator>) -> Self {
        Self { primary }
    }
}

impl TokenEstimator for FallbackTokenEstimator {
    fn estimate(&self, text: &str) -> Result<usize, EstimationError> {
        match self.primary.estimate(text) {
            Ok(cost) => Ok(cost),
            Err(err) => {
                warn!(error = %err, "primary token estimator failed, using heuristic");
                Ok(estimate_tokens(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl TokenEstimator for AlwaysFails {
        fn estimate(&self, _text: &str) -> Result<usize, EstimationError> {
            Err(EstimationError::new("model not recognized"))
        }
    }

    struct FixedCost(usize);

    impl TokenEstimator for FixedCost {
        fn estimate(&self, _text: &str) -> Result<usize, EstimationError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("Hello"), 2);
        assert_eq!(estimate_tokens("Hello world"), 3);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens(""), 1);
    }

    #[test]
    fn test_heuristic_estimator() {
        let estimator = HeuristicTokenEstimator::new();
        assert_eq!(estimator.estimate("Hello").unwrap(), 2);
    }

    #[test]
    fn test_fallback_uses_primary_when_available() {
        let estimator = FallbackTokenEstimator::new(Arc::new(FixedCost(42)));
        assert_eq!(estimator.estimate("Hello").unwrap(), 42);
    }

    #[test]
    fn test_fallback_on_estimation_failure() {
        let estimator = FallbackTokenEstimator::new(Arc::new(AlwaysFails));
        assert_eq!(estimator.estimate("Hello").unwrap(), 2);
    }
}
