//! GitGuru — console entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Load the command catalog and build the LLM provider
//!   5. Run the console loop

use tokio::sync::mpsc;
use tracing::info;

use gitguru::catalog::Catalog;
use gitguru::chat::{ChatSession, SessionText};
use gitguru::error::AppError;
use gitguru::llm::providers;
use gitguru::{config, console, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        app = %config.app_name,
        provider = %config.llm.provider,
        model = %config.llm.openrouter.model,
        "config loaded"
    );

    let catalog = Catalog::load()?;
    let provider = providers::build(&config.llm)?;

    let (failure_tx, failure_rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(provider, SessionText::default(), Some(failure_tx));

    console::run(session, catalog, failure_rx).await
}
