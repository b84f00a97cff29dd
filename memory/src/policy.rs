//! # Bounding Policy
//!
//! This module defines the policy that controls how history and summary stay
//! within a size or count limit.
//!
//! ## BoundingPolicy
//!
//! Selected once at construction and immutable for the store's lifetime.
//!
//! | Variant | Parameter | Behavior after each append |
//! |---------|-----------|----------------------------|
//! | `Unbounded` | - | No enforcement |
//! | `Window` | `k` | Keep only the `k` most recent turns |
//! | `TokenBuffer` | `max_token_limit` | Evict oldest turns until estimated cost fits |
//! | `Summary` | - | Summarize the whole history, clear it |
//! | `SummaryBuffer` | `max_token_limit` | Evict oldest turns into an appended summary |
//!
//! ## StrategyKind
//!
//! A parameter-free tag for each strategy, with `FromStr` support for
//! config-driven construction:
//!
//! ```rust
//! use memory::StrategyKind;
//!
//! let kind: StrategyKind = "summary_buffer".parse().unwrap();
//! assert_eq!(kind, StrategyKind::SummaryBuffer);
//! assert!("episodic".parse::<StrategyKind>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MemoryError;

/// Parameter-free tag identifying a bounding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Unbounded,
    Window,
    TokenBuffer,
    Summary,
    SummaryBuffer,
}

impl StrategyKind {
    /// The config tag for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Unbounded => "unbounded",
            StrategyKind::Window => "window",
            StrategyKind::TokenBuffer => "token_buffer",
            StrategyKind::Summary => "summary",
            StrategyKind::SummaryBuffer => "summary_buffer",
        }
    }

    /// Whether the strategy requires an injected token estimator.
    pub fn needs_estimator(&self) -> bool {
        matches!(self, StrategyKind::TokenBuffer | StrategyKind::SummaryBuffer)
    }

    /// Whether the strategy requires an injected summarizer.
    pub fn needs_summarizer(&self) -> bool {
        matches!(self, StrategyKind::Summary | StrategyKind::SummaryBuffer)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbounded" => Ok(StrategyKind::Unbounded),
            "window" => Ok(StrategyKind::Window),
            "token_buffer" => Ok(StrategyKind::TokenBuffer),
            "summary" => Ok(StrategyKind::Summary),
            "summary_buffer" => Ok(StrategyKind::SummaryBuffer),
            other => Err(MemoryError::Configuration(format!(
                "unknown memory strategy: {other}"
            ))),
        }
    }
}

/// Policy controlling how history and summary stay bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundingPolicy {
    /// Keep every turn.
    Unbounded,
    /// Keep only the `k` most recent turns.
    Window { k: usize },
    /// Evict oldest turns while the estimated cost exceeds `max_token_limit`.
    TokenBuffer { max_token_limit: usize },
    /// Re-summarize the whole history on every append; keep no raw turns.
    Summary,
    /// Token ceiling plus a rolling summary of evicted turns.
    SummaryBuffer { max_token_limit: usize },
}

impl BoundingPolicy {
    /// The tag of this policy's strategy.
    pub fn kind(&self) -> StrategyKind {
        match self {
            BoundingPolicy::Unbounded => StrategyKind::Unbounded,
            BoundingPolicy::Window { .. } => StrategyKind::Window,
            BoundingPolicy::TokenBuffer { .. } => StrategyKind::TokenBuffer,
            BoundingPolicy::Summary => StrategyKind::Summary,
            BoundingPolicy::SummaryBuffer { .. } => StrategyKind::SummaryBuffer,
        }
    }

    /// Validates the policy parameters.
    pub fn validate(&self) -> Result<(), MemoryError> {
        match self {
            BoundingPolicy::Window { k: 0 } => Err(MemoryError::Configuration(
                "window strategy requires k >= 1".to_string(),
            )),
            BoundingPolicy::TokenBuffer { max_token_limit: 0 }
            | BoundingPolicy::SummaryBuffer { max_token_limit: 0 } => {
                Err(MemoryError::Configuration(format!(
                    "{} strategy requires max_token_limit >= 1",
                    self.kind()
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_roundtrip() {
        for kind in [
            StrategyKind::Unbounded,
            StrategyKind::Window,
            StrategyKind::TokenBuffer,
            StrategyKind::Summary,
            StrategyKind::SummaryBuffer,
        ] {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_strategy_tag() {
        let err = "vector".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, MemoryError::Configuration(_)));
    }

    #[test]
    fn test_policy_kind() {
        assert_eq!(BoundingPolicy::Window { k: 3 }.kind(), StrategyKind::Window);
        assert_eq!(BoundingPolicy::Summary.kind(), StrategyKind::Summary);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert!(BoundingPolicy::Window { k: 0 }.validate().is_err());
        assert!(BoundingPolicy::Window { k: 1 }.validate().is_ok());
    }

    #[test]
    fn test_zero_token_limit_is_rejected() {
        assert!(BoundingPolicy::TokenBuffer { max_token_limit: 0 }
            .validate()
            .is_err());
        assert!(BoundingPolicy::SummaryBuffer { max_token_limit: 0 }
            .validate()
            .is_err());
        assert!(BoundingPolicy::TokenBuffer { max_token_limit: 10 }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_capability_requirements() {
        assert!(StrategyKind::TokenBuffer.needs_estimator());
        assert!(StrategyKind::SummaryBuffer.needs_estimator());
        assert!(!StrategyKind::Summary.needs_estimator());
        assert!(StrategyKind::Summary.needs_summarizer());
        assert!(StrategyKind::SummaryBuffer.needs_summarizer());
        assert!(!StrategyKind::Window.needs_summarizer());
    }
}
