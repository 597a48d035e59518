//! `ChatSession` — the conversation store behind the Q&A panel.
//!
//! Owns the ordered transcript, the single-flight busy flag, and the
//! generation counter that suppresses stale replies after a reset.  All
//! state lives behind one async mutex; the handle is cheap to clone and
//! every clone sees the same session.
//!
//! The lock is never held across the provider call — `send` snapshots what
//! it needs, awaits the completion unlocked, then re-locks to apply the
//! result (or drop it, if a `clear` raced the request).

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::llm::{LlmProvider, Turn};
use super::message::{Message, Role};

/// Greeting seeded into every fresh conversation.
pub const DEFAULT_GREETING: &str =
    "Hi! I'm GitGuru, your Git assistant. How can I help you today?";

/// Fixed, non-technical notice appended in place of a reply when the
/// completion fails. Detail goes out on the failure channel instead.
pub const DEFAULT_ERROR_NOTICE: &str =
    "Sorry, something went wrong while answering your question. Please try again later.";

// ── Supporting types ─────────────────────────────────────────────────────────

/// Fixed strings injected at construction — substitutable in tests.
#[derive(Debug, Clone)]
pub struct SessionText {
    pub greeting: String,
    pub error_notice: String,
}

impl Default for SessionText {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            error_notice: DEFAULT_ERROR_NOTICE.to_string(),
        }
    }
}

/// Side-channel payload fired exactly once per failed send — the front end
/// surfaces it as a transient banner next to the inline error notice.
#[derive(Debug, Clone)]
pub struct SendFailure {
    pub detail: String,
}

/// What a `send` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input, or a request already in flight — nothing changed.
    Ignored,
    /// Reply appended.
    Replied,
    /// Completion failed; the transcript carries the error notice.
    Failed,
    /// The session was cleared while the request was in flight; its result
    /// was dropped without touching the transcript.
    Discarded,
}

struct SessionState {
    messages: Vec<Message>,
    busy: bool,
    generation: u64,
}

// ── ChatSession ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ChatSession {
    provider: LlmProvider,
    text: SessionText,
    failures: Option<mpsc::UnboundedSender<SendFailure>>,
    state: Arc<Mutex<SessionState>>,
}

impl ChatSession {
    /// Create a session seeded with the greeting. `failures` receives one
    /// notification per failed send; pass `None` to drop them.
    pub fn new(
        provider: LlmProvider,
        text: SessionText,
        failures: Option<mpsc::UnboundedSender<SendFailure>>,
    ) -> Self {
        let seeded = vec![Message::new(Role::Assistant, text.greeting.clone())];
        Self {
            provider,
            text,
            failures,
            state: Arc::new(Mutex::new(SessionState {
                messages: seeded,
                busy: false,
                generation: 0,
            })),
        }
    }

    /// Snapshot of the ordered transcript, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.messages.clone()
    }

    /// Whether a request is currently in flight.
    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.busy
    }

    /// Submit one user turn and await the assistant's reply.
    ///
    /// Appends exactly one `user` message and at most one reply-turn message
    /// (real reply or error notice — never both). Empty input and re-entrant
    /// sends are rejected before anything is appended.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SendOutcome::Ignored;
        }

        let (history, generation) = {
            let mut state = self.state.lock().await;
            if state.busy {
                debug!("send rejected: request already in flight");
                return SendOutcome::Ignored;
            }
            state.busy = true;
            // The seeded greeting is always index 0 and is excluded from the
            // outbound request so it cannot steer the model.
            let history: Vec<Turn> = state
                .messages
                .iter()
                .skip(1)
                .map(|m| Turn { role: m.role, content: m.content.clone() })
                .collect();
            state.messages.push(Message::new(Role::User, trimmed));
            (history, state.generation)
        };

        let result = self.provider.complete(&history, trimmed).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            // Cleared while we were waiting. `clear` already reset busy and
            // re-seeded the transcript; this result belongs to a dead
            // conversation and must not reappear in the fresh one.
            debug!("stale completion discarded after clear");
            return SendOutcome::Discarded;
        }
        state.busy = false;

        match result {
            Ok(reply) => {
                state.messages.push(Message::new(Role::Assistant, reply));
                SendOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "completion failed");
                state
                    .messages
                    .push(Message::new(Role::Assistant, self.text.error_notice.clone()));
                drop(state);
                if let Some(tx) = &self.failures {
                    let _ = tx.send(SendFailure { detail: e.to_string() });
                }
                SendOutcome::Failed
            }
        }
    }

    /// Discard the transcript and re-seed the greeting. Safe to call while a
    /// request is in flight: the generation bump makes the eventual result
    /// stale, so `send` drops it instead of appending to the new transcript.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.busy = false;
        state.messages.clear();
        state
            .messages
            .push(Message::new(Role::Assistant, self.text.greeting.clone()));
        debug!(generation = state.generation, "session cleared");
    }
}
