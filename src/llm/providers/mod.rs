//! LLM provider implementations.
//!
//! `build(config)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openrouter;
pub mod scripted;

use crate::config::LlmConfig;
use crate::llm::{CompletionError, LlmProvider};

/// Construct a `LlmProvider` from config.
///
/// The API credential is never part of `config` — the OpenRouter provider
/// reads it from the environment at call time, so a key added after startup
/// is picked up without a restart.
pub fn build(config: &LlmConfig) -> Result<LlmProvider, CompletionError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openrouter" => {
            let p = openrouter::OpenRouterProvider::new(&config.openrouter)?;
            Ok(LlmProvider::OpenRouter(p))
        }
        other => Err(CompletionError::Configuration(format!(
            "unknown provider: {other}"
        ))),
    }
}
