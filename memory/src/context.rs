//! # Rendered Context
//!
//! This module provides the value returned by
//! [`ConversationMemory::render`](crate::ConversationMemory::render): the
//! summary of evicted turns (if any) followed by the surviving history,
//! oldest first, ready to be formatted for the next model invocation.

use serde::{Deserialize, Serialize};

use crate::types::Turn;

/// Fixed label prefixed to the summary when the context is formatted as
/// conversation lines.
pub const SUMMARY_LABEL: &str = "Summary of earlier conversation:";

/// A bounded projection of the dialogue so far.
///
/// Combines, in order: the summary of turns that have been summarized away
/// (absent when no summarization has happened), then the raw history turns
/// oldest first. An empty context (no summary, no turns) is a valid value,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedContext {
    /// Condensed text covering evicted turns, if any.
    pub summary: Option<String>,
    /// Surviving history, oldest first.
    pub turns: Vec<Turn>,
}

impl RenderedContext {
    /// The explicitly empty context.
    pub fn empty() -> Self {
        Self {
            summary: None,
            turns: Vec::new(),
        }
    }

    /// True when there is neither a summary nor any history.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.turns.is_empty()
    }

    /// The context as conversation lines: the labeled summary first (when
    /// present), then the role-prefixed lines of each turn.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.turns.len() * 2 + 1);

        if let Some(ref summary) = self.summary {
            lines.push(format!("{SUMMARY_LABEL} {summary}"));
        }

        for turn in &self.turns {
            let [user, assistant] = turn.to_lines();
            lines.push(user);
            lines.push(assistant);
        }

        lines
    }

    /// Formats the context for AI model input.
    ///
    /// A newline-separated string ready for inclusion in a prompt. Empty
    /// contexts format as the empty string.
    pub fn format_for_model(&self) -> String {
        self.to_lines().join("\n")
    }
}
