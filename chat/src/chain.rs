//! # Conversation Chain
//!
//! The per-session loop tying a [`ChatClient`] to a bounded
//! [`ConversationMemory`]: render the context, build the prompt, call the
//! model, record the exchange. The chain owns its memory; create one chain
//! per conversation session and drop it at session end.

use std::sync::Arc;

use dialog_core::{DialogError, Result};
use memory::{ConversationMemory, RenderedContext};
use tracing::{debug, instrument};

use crate::client::ChatClient;

/// A conversation session over a model endpoint and a bounded memory.
pub struct ConversationChain {
    client: Arc<dyn ChatClient>,
    memory: ConversationMemory,
    system_message: Option<String>,
}

impl ConversationChain {
    pub fn new(client: Arc<dyn ChatClient>, memory: ConversationMemory) -> Self {
        Self {
            client,
            memory,
            system_message: None,
        }
    }

    /// Sets the system message sent with every completion.
    pub fn with_system_message(mut self, message: &str) -> Self {
        self.system_message = Some(message.to_string());
        self
    }

    /// Read access to the underlying memory, e.g. for stats or persistence.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Sends one user input through the model and records the exchange.
    ///
    /// Context comes from the memory's rendered history; the reply is
    /// appended back before returning, so the next call sees this turn.
    #[instrument(skip(self, input))]
    pub async fn send(&mut self, input: &str) -> Result<String> {
        let context = self
            .memory
            .render()
            .map_err(|e| DialogError::Memory(e.to_string()))?;
        let prompt = build_prompt(&context, input);

        debug!(
            context_turns = context.turns.len(),
            has_summary = context.summary.is_some(),
            "requesting completion"
        );

        let reply = self
            .client
            .complete(self.system_message.as_deref(), &prompt)
            .await?;

        self.memory
            .append(input, reply.as_str())
            .await
            .map_err(|e| DialogError::Memory(e.to_string()))?;

        Ok(reply)
    }

    /// Clears the conversation memory. The chain is reusable afterwards.
    pub fn reset(&mut self) {
        self.memory.reset();
    }
}

fn build_prompt(context: &RenderedContext, input: &str) -> String {
    let mut prompt = String::new();

    for line in context.to_lines() {
        prompt.push_str(&line);
        prompt.push('\n');
    }

    prompt.push_str("User: ");
    prompt.push_str(input);
    prompt.push_str("\nAssistant:");
    prompt
}
