//! GitGuru — Git command reference plus an assistant chat session core.
//!
//! The interesting part is [`chat::ChatSession`]: an append-only transcript
//! with single-flight sends and generation-tagged stale-reply suppression.
//! [`llm`] holds the provider backends, [`catalog`] the command reference,
//! and [`console`] a minimal front end that consumes all of it.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod logger;
