//! Dummy LLM provider — echoes input back prefixed with `[echo]`.
//! Used for keyless local runs and for exercising the session without a
//! real endpoint.

use crate::llm::{CompletionError, Turn};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(
        &self,
        _history: &[Turn],
        new_text: &str,
    ) -> Result<String, CompletionError> {
        Ok(format!("[echo] {new_text}"))
    }
}
