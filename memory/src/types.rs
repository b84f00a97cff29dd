//! # Core Types
//!
//! This module defines the core types for the memory crate.
//!
//! ## TurnRole
//!
//! Represents the two sides of an exchange.
//!
//! ### Variants
//!
//! - `User`: Text produced by the user
//! - `Assistant`: Text produced by the model
//!
//! ## Turn
//!
//! One complete exchange: the user input and the model output, with a
//! generated UUID and a creation timestamp. Turns are immutable once
//! appended to a store; ordering is insertion order, oldest first.
//!
//! ### Example
//!
//! ```rust
//! use memory::Turn;
//!
//! let turn = Turn::new("Hello", "Hi there!");
//! assert_eq!(turn.render(), "User: Hello\nAssistant: Hi there!");
//! ```
//!
//! ## Serialization
//!
//! All types implement `Serialize` and `Deserialize`, allowing easy JSON
//! serialization:
//!
//! ```rust
//! use memory::Turn;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let turn = Turn::new("Hello", "Hi there!");
//!     let json = serde_json::to_string(&turn)?;
//!     let deserialized: Turn = serde_json::from_str(&json)?;
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the two sides of an exchange.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Line prefix used when formatting conversation text for a model.
    pub fn prefix(&self) -> &'static str {
        match self {
            TurnRole::User => "User",
            TurnRole::Assistant => "Assistant",
        }
    }
}

/// One user-input/model-output exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// Unique identifier
    pub id: Uuid,
    /// Text produced by the user
    pub input: String,
    /// Text produced by the model
    pub output: String,
    /// When the exchange was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a new `Turn` with a generated UUID and the current time.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: input.into(),
            output: output.into(),
            timestamp: Utc::now(),
        }
    }

    /// The two role-prefixed lines of this exchange, user line first.
    pub fn to_lines(&self) -> [String; 2] {
        [
            format!("{}: {}", TurnRole::User.prefix(), self.input),
            format!("{}: {}", TurnRole::Assistant.prefix(), self.output),
        ]
    }

    /// Formats the exchange as conversation text, one line per role.
    pub fn render(&self) -> String {
        self.to_lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_creation() {
        let turn = Turn::new("Hello", "Hi there!");
        assert_eq!(turn.input, "Hello");
        assert_eq!(turn.output, "Hi there!");
    }

    #[test]
    fn test_turn_lines() {
        let turn = Turn::new("Hello", "Hi there!");
        let [user, assistant] = turn.to_lines();
        assert_eq!(user, "User: Hello");
        assert_eq!(assistant, "Assistant: Hi there!");
    }

    #[test]
    fn test_turn_role_serialization() {
        let role = TurnRole::User;
        let serialized = serde_json::to_string(&role).unwrap();
        assert_eq!(serialized, "\"User\"");

        let deserialized: TurnRole = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, TurnRole::User);
    }

    #[test]
    fn test_turn_serialization_roundtrip() {
        let turn = Turn::new("Hello", "Hi there!");
        let json = serde_json::to_string(&turn).unwrap();
        let deserialized: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, turn);
    }
}
