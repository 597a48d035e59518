//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies the `GITGURU_LOG_LEVEL` env override. The API credential is
//! never configured here — the OpenRouter provider reads it from the
//! environment at call time.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

const CONFIG_PATH: &str = "config/default.toml";

/// OpenRouter provider configuration (`[llm.openrouter]` in the TOML).
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Cap on generated tokens per reply.
    pub max_tokens: u32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Persona/instruction string synthesized as the request's system turn.
    pub persona: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            persona: default_persona(),
        }
    }
}

/// LLM configuration (`[llm]` in the TOML).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"openrouter"` or `"dummy"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    pub openrouter: OpenRouterConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub log_level: String,
    pub llm: LlmConfig,
}

// ── Raw TOML shapes ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawApp {
    fn default() -> Self {
        Self { name: default_app_name(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_provider")]
    provider: String,
    #[serde(default)]
    openrouter: RawOpenRouter,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_provider(), openrouter: RawOpenRouter::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenRouter {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_persona")]
    persona: String,
}

impl Default for RawOpenRouter {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            persona: default_persona(),
        }
    }
}

fn default_app_name() -> String { "gitguru".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_provider() -> String { "openrouter".to_string() }
fn default_api_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}
fn default_model() -> String { "mistralai/mistral-7b-instruct".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 1000 }
fn default_timeout_seconds() -> u64 { 60 }
fn default_persona() -> String {
    "You are GitGuru, an assistant specialized in Git. Provide accurate, helpful \
     answers about Git commands, workflows, and best practices. Keep answers clear \
     and concise, with practical examples where relevant."
        .to_string()
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Load `config/default.toml` and apply env overrides.
pub fn load() -> Result<Config, AppError> {
    let log_level = env::var("GITGURU_LOG_LEVEL").ok();
    load_from(Path::new(CONFIG_PATH), log_level.as_deref())
}

/// Load from an explicit path. Overrides are parameters (not read from env
/// here) so tests stay free of env races.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let data = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let raw: RawConfig = toml::from_str(&data)
        .map_err(|e| AppError::Config(format!("malformed {}: {e}", path.display())))?;

    let log_level = log_level_override
        .map(str::to_string)
        .unwrap_or(raw.app.log_level);

    Ok(Config {
        app_name: raw.app.name,
        log_level,
        llm: LlmConfig {
            provider: raw.llm.provider,
            openrouter: OpenRouterConfig {
                api_base_url: raw.llm.openrouter.api_base_url,
                model: raw.llm.openrouter.model,
                temperature: raw.llm.openrouter.temperature,
                max_tokens: raw.llm.openrouter.max_tokens,
                timeout_seconds: raw.llm.openrouter.timeout_seconds,
                persona: raw.llm.openrouter.persona,
            },
        },
    })
}
