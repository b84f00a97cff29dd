//! # dialog-core
//!
//! Shared error type and tracing initialization for the dialog workspace:
//! [`DialogError`], the [`Result`] alias, and [`init_tracing`]. Carries no
//! conversation logic; used by the chat crate and by host binaries.

pub mod error;
pub mod logger;

pub use error::{DialogError, Result};
pub use logger::init_tracing;
