//! # chat
//!
//! Host-side conversation loop over a bounded [`memory::ConversationMemory`]:
//! the [`ChatClient`] trait with an OpenAI-backed implementation, an
//! LLM-backed [`memory::Summarizer`], and the [`ConversationChain`] that
//! renders context, calls the model, and records each exchange. Lifecycle is
//! caller-controlled: one chain per conversation session, no globals.

pub mod chain;
pub mod client;
pub mod summarize;

pub use chain::ConversationChain;
pub use client::{ChatClient, OpenAiChatClient};
pub use summarize::LlmSummarizer;
