//! # Memory Crate
//!
//! The `memory` crate keeps a bounded, running representation of a dialogue
//! across conversation turns. Each turn (one user input plus one model
//! output) is appended to an in-memory history; a bounding policy decides
//! what survives: everything, the last `k` turns, whatever fits a token
//! budget, a rolling summary, or a summary-plus-buffer hybrid.
//!
//! ## Features
//!
//! - **Five bounding strategies** selected at construction time
//! - **Injected capabilities** for token counting and summarization, so the
//!   store never talks to a model API itself
//! - **Degradation-safe accounting**: a failing estimator or summarizer
//!   never loses a turn and never fails an append
//! - **Serde serialization** on the data model for easy data exchange
//!
//! ## Quick Start
//!
//! ```rust
//! use memory::{BoundingPolicy, ConversationMemory};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), memory::MemoryError> {
//! let mut memory = ConversationMemory::builder(BoundingPolicy::Window { k: 2 }).build()?;
//!
//! memory.append("hi", "hello").await?;
//! memory.append("bye", "later").await?;
//!
//! let context = memory.render()?;
//! assert_eq!(context.turns.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions
//! - [`policy`] - Bounding policy and strategy tags
//! - [`capability`] - Injected estimator/summarizer traits
//! - [`estimate`] - Heuristic and fallback token estimators
//! - [`buffer`] - The conversation memory store
//! - [`context`] - Rendered context for model input
//!
//! ## External Interactions
//!
//! The crate calls out only through its two capability traits:
//! - **Token counting**: any [`TokenEstimator`] implementation (a tokenizer,
//!   a remote API, or the provided heuristic)
//! - **Summarization**: any [`Summarizer`] implementation (typically an LLM
//!   call owned by the host, e.g. the `chat` crate's `LlmSummarizer`)
//!
//! The host conversation loop calls in per turn: `append` after the model
//! responds, `render` to build the next model invocation.

pub mod buffer;
pub mod capability;
pub mod context;
pub mod error;
pub mod estimate;
pub mod policy;
pub mod types;

pub use buffer::{ConversationMemory, ConversationMemoryBuilder, MemoryStats};
pub use capability::{EstimationError, SummarizationError, Summarizer, TokenEstimator};
pub use context::{RenderedContext, SUMMARY_LABEL};
pub use error::MemoryError;
pub use estimate::{estimate_tokens, FallbackTokenEstimator, HeuristicTokenEstimator};
pub use policy::{BoundingPolicy, StrategyKind};
pub use types::{Turn, TurnRole};
