//! Logging setup — `tracing` with an env-filter.
//!
//! `RUST_LOG` wins over the configured level when set.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub fn init(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Logger(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(e.to_string()))
}
