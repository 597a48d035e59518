//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; `complete` is an
//! `async fn` on the enum so callers need no trait-object machinery.

pub mod providers;

use thiserror::Error;

use crate::chat::Role;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Failure taxonomy for a completion attempt.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing or unusable local configuration (e.g. no API key in the
    /// environment). No network call was attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The endpoint was reached but returned a non-success status.
    #[error("completion endpoint returned {status}: {message}")]
    Transport { status: u16, message: String },

    /// Connection-level fault below the HTTP status layer.
    #[error("network error: {0}")]
    Network(String),
}

// ── Wire types ────────────────────────────────────────────────────────────────

/// One history entry as sent on the wire — ids and timestamps already
/// stripped, only what the completion endpoint needs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    OpenRouter(providers::openrouter::OpenRouterProvider),
    Dummy(providers::dummy::DummyProvider),
    Scripted(providers::scripted::ScriptedProvider),
}

impl LlmProvider {
    /// Send the conversation so far (`history`, greeting already excluded)
    /// plus the latest user text, and return the assistant's reply.
    pub async fn complete(
        &self,
        history: &[Turn],
        new_text: &str,
    ) -> Result<String, CompletionError> {
        match self {
            LlmProvider::OpenRouter(p) => p.complete(history, new_text).await,
            LlmProvider::Dummy(p) => p.complete(history, new_text).await,
            LlmProvider::Scripted(p) => p.complete(history, new_text).await,
        }
    }
}
