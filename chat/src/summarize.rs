//! # LLM Summarizer
//!
//! Implements [`memory::Summarizer`] by prompting a [`ChatClient`] to fold
//! new conversation lines into the previous summary. Client failures map to
//! [`SummarizationError`], which the memory store absorbs per its
//! degradation rule.

use std::sync::Arc;

use async_trait::async_trait;
use memory::{SummarizationError, Summarizer, Turn};
use tracing::debug;

use crate::client::ChatClient;

const SUMMARY_SYSTEM_MESSAGE: &str = "You condense conversation history. \
Progressively summarize the lines of conversation provided, adding onto the \
previous summary and returning a new summary. Keep facts, names, and \
decisions. Respond with the summary only.";

/// Condenses turns through a chat model.
#[derive(Clone)]
pub struct LlmSummarizer {
    client: Arc<dyn ChatClient>,
}

impl LlmSummarizer {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    fn build_prompt(prior: Option<&str>, turns: &[Turn]) -> String {
        let mut prompt = String::new();

        if let Some(prior) = prior {
            prompt.push_str("Current summary:\n");
            prompt.push_str(prior);
            prompt.push_str("\n\n");
        }

        prompt.push_str("New lines of conversation:\n");
        for turn in turns {
            prompt.push_str(&turn.render());
            prompt.push('\n');
        }
        prompt.push_str("\nNew summary:");

        prompt
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(
        &self,
        prior: Option<&str>,
        turns: &[Turn],
    ) -> Result<String, SummarizationError> {
        let prompt = Self::build_prompt(prior, turns);
        debug!(turns = turns.len(), has_prior = prior.is_some(), "summarizing");

        let summary = self
            .client
            .complete(Some(SUMMARY_SYSTEM_MESSAGE), &prompt)
            .await
            .map_err(|e| SummarizationError::new(e.to_string()))?;

        Ok(summary.trim().to_string())
    }
}
