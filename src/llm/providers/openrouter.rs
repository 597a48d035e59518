//! OpenRouter chat-completions provider.
//!
//! One POST per completion: a synthesized persona `system` turn, the
//! conversation history, and the new user turn, with fixed sampling
//! parameters from config. The bearer credential comes from the
//! `OPENROUTER_API_KEY` environment variable at call time — never TOML —
//! and its absence fails the call before any network traffic.

use std::env;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OpenRouterConfig;
use crate::llm::{CompletionError, Turn};
use crate::chat::Role;

/// Environment variable holding the bearer credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Client-identifying headers sent with every request.
const REFERER: &str = "https://gitguru.dev/";
const CLIENT_TITLE: &str = "GitGuru AI Chat";

/// Literal reply used when a success response has no extractable text.
/// Preserved source behavior: a degraded reply beats a hard parse failure.
pub const FALLBACK_REPLY: &str = "No response.";

// ── Wire shapes ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Turn>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    /// Legacy completions shape — consulted when `message.content` is absent.
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error body shape returned on non-success statuses.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

// ── Provider ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    http: HttpClient,
    api_base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    persona: String,
}

impl OpenRouterProvider {
    pub fn new(config: &OpenRouterConfig) -> Result<Self, CompletionError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CompletionError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            persona: config.persona.clone(),
        })
    }

    pub async fn complete(
        &self,
        history: &[Turn],
        new_text: &str,
    ) -> Result<String, CompletionError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| {
            CompletionError::Configuration(format!("{API_KEY_ENV} is not set"))
        })?;

        let body = CompletionRequest {
            model: &self.model,
            messages: compose(&self.persona, history, new_text),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, turns = body.messages.len(), "requesting completion");

        let response = self
            .http
            .post(&self.api_base_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", CLIENT_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|b| b.error.and_then(|e| e.message))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(CompletionError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response.json::<CompletionResponse>().await.ok();
        Ok(extract_reply(parsed))
    }
}

/// Build the outbound message list: persona system turn, history in order,
/// then the new user turn.
pub(crate) fn compose(persona: &str, history: &[Turn], new_text: &str) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Turn {
        role: Role::System,
        content: persona.to_string(),
    });
    messages.extend_from_slice(history);
    messages.push(Turn {
        role: Role::User,
        content: new_text.to_string(),
    });
    messages
}

/// Pull the reply text out of a parsed success body, trimmed. Each arm is
/// consulted in turn — `message.content`, then the legacy `text` field —
/// and a blank arm falls through to the next. Anything left over degrades
/// to [`FALLBACK_REPLY`] instead of an error.
fn extract_reply(parsed: Option<CompletionResponse>) -> String {
    parsed
        .and_then(|r| r.choices.into_iter().next())
        .and_then(|c| {
            c.message
                .and_then(|m| m.content)
                .and_then(non_blank)
                .or_else(|| c.text.and_then(non_blank))
        })
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
