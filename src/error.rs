//! Application-wide error types.

use thiserror::Error;

use crate::llm::CompletionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("llm error: {0}")]
    Llm(#[from] CompletionError),
}
