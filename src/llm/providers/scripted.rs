//! Scripted provider — each `complete` call consumes one result fed in by
//! the caller through a channel.
//!
//! Lets tests script replies and failures, and — because `complete` parks
//! until a result is sent — hold a request in flight while the test pokes
//! at the session (single-flight rejection, clear-while-busy).

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::llm::{CompletionError, Turn};

#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    results: Arc<Mutex<mpsc::UnboundedReceiver<Result<String, CompletionError>>>>,
    calls: Arc<std::sync::Mutex<Vec<RecordedCall>>>,
}

/// What the session handed to one `complete` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub history: Vec<Turn>,
    pub new_text: String,
}

impl ScriptedProvider {
    /// Provider plus the sender that feeds it, one result per `complete` call.
    pub fn channel() -> (
        Self,
        mpsc::UnboundedSender<Result<String, CompletionError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = Self {
            results: Arc::new(Mutex::new(rx)),
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
        };
        (provider, tx)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub async fn complete(
        &self,
        history: &[Turn],
        new_text: &str,
    ) -> Result<String, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                history: history.to_vec(),
                new_text: new_text.to_string(),
            });
        }
        let mut results = self.results.lock().await;
        match results.recv().await {
            Some(result) => result,
            None => Err(CompletionError::Network("script exhausted".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumes_results_in_order() {
        let (p, tx) = ScriptedProvider::channel();
        tx.send(Ok("first".into())).unwrap();
        tx.send(Err(CompletionError::Network("down".into()))).unwrap();

        assert_eq!(p.complete(&[], "a").await.unwrap(), "first");
        assert!(p.complete(&[], "b").await.is_err());
    }

    #[tokio::test]
    async fn closed_channel_yields_network_error() {
        let (p, tx) = ScriptedProvider::channel();
        drop(tx);
        let err = p.complete(&[], "a").await.unwrap_err();
        assert!(err.to_string().contains("script exhausted"));
    }
}
