//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{ActiveModel, LLMConfigResponse, LLMConfigUpdate, LLMProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            gemini_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            config_path: PathBuf::new(),
        }
    }
}

/// First non-empty value among `names`.
fn env_key(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        // Env vars as fallback for API keys
        if config.openai_api_key.is_none() {
            config.openai_api_key = env_key(&["OPENAI_API_KEY"]);
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = env_key(&["ANTHROPIC_API_KEY"]);
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = env_key(&["GROQ_API_KEY"]);
        }
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = env_key(&["GEMINI_API_KEY", "GEMINI_KEY"]);
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> deadline_core::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config. Empty keys clear the key.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        fn set_key(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(k) = value {
                *slot = Some(k.trim().to_string()).filter(|k| !k.is_empty());
            }
        }

        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.to_lowercase();
        }
        set_key(&mut self.openai_api_key, &update.openai_api_key);
        set_key(&mut self.anthropic_api_key, &update.anthropic_api_key);
        set_key(&mut self.groq_api_key, &update.groq_api_key);
        set_key(&mut self.gemini_api_key, &update.gemini_api_key);
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(m) = &update.anthropic_model {
            self.anthropic_model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq_model = m.clone();
        }
        if let Some(m) = &update.gemini_model {
            self.gemini_model = m.clone();
        }
    }

    fn candidate(&self, provider: LLMProvider) -> Option<(LLMProvider, String, String)> {
        let (key, model) = match provider {
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
            LLMProvider::Gemini => (&self.gemini_api_key, &self.gemini_model),
        };
        key.as_ref().map(|k| (provider, model.clone(), k.clone()))
    }

    /// Resolve which provider, model and API key to use.
    pub fn resolve_provider(&self) -> Option<(LLMProvider, String, String)> {
        // Explicit preference
        if self.preferred_provider != "auto" {
            let provider = match self.preferred_provider.as_str() {
                "openai" => LLMProvider::OpenAI,
                "anthropic" => LLMProvider::Anthropic,
                "groq" => LLMProvider::Groq,
                "gemini" => LLMProvider::Gemini,
                _ => return None,
            };
            return self.candidate(provider);
        }

        // Auto mode: Anthropic > Groq > Gemini > OpenAI
        [
            LLMProvider::Anthropic,
            LLMProvider::Groq,
            LLMProvider::Gemini,
            LLMProvider::OpenAI,
        ]
        .into_iter()
        .find_map(|p| self.candidate(p))
    }

    /// Provider and model that the next call would use.
    pub fn active_model(&self) -> Option<ActiveModel> {
        self.resolve_provider()
            .map(|(provider, model, _)| ActiveModel { provider, model })
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            gemini_configured: self.gemini_api_key.is_some(),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            gemini_model: self.gemini_model.clone(),
            active_provider: self.active_model().map(|a| a.provider.to_string()),
        }
    }
}
