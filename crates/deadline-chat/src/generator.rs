//! Generative model capability.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use reqwest::Client;
use tracing::info;

use deadline_core::{Error, Result};

use crate::config::LLMConfig;
use crate::providers::{collect_stream, stream_llm, Sampling};
use crate::types::{ActiveModel, ChatMessage};

/// Greedy decoding with a bounded reply.
pub const EXTRACTION_SAMPLING: Sampling = Sampling {
    temperature: 0.0,
    max_tokens: 1250,
};

/// Trait for generative model backends.
///
/// The returned text is opaque: it may or may not be valid JSON.
pub trait TextGenerator: Send + Sync {
    /// Produce a completion for `messages`.
    fn generate(&self, messages: Vec<ChatMessage>) -> BoxFuture<'_, Result<String>>;

    /// Provider and model a call would use right now, if any.
    fn active_model(&self) -> Option<ActiveModel>;

    fn is_available(&self) -> bool {
        self.active_model().is_some()
    }
}

/// Generator backed by an external LLM API.
///
/// The provider is re-resolved from the shared config on every call, so
/// config updates take effect without a restart.
pub struct LlmGenerator {
    client: Client,
    config: Arc<RwLock<LLMConfig>>,
}

impl LlmGenerator {
    pub fn new(config: Arc<RwLock<LLMConfig>>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Arc<RwLock<LLMConfig>> {
        &self.config
    }
}

impl TextGenerator for LlmGenerator {
    fn generate(&self, messages: Vec<ChatMessage>) -> BoxFuture<'_, Result<String>> {
        // Resolve before awaiting so the lock guard never crosses an await point
        let resolved = self.config.read().resolve_provider();
        Box::pin(async move {
            let (provider, model, api_key) = resolved.ok_or_else(|| {
                Error::Config("No LLM provider configured. Set an API key.".into())
            })?;
            info!("Generating with {} ({})", provider, model);
            let stream = stream_llm(
                &self.client,
                provider,
                messages,
                &model,
                &api_key,
                EXTRACTION_SAMPLING,
            );
            collect_stream(stream).await
        })
    }

    fn active_model(&self) -> Option<ActiveModel> {
        self.config.read().active_model()
    }
}
