//! Shared application state.

use std::sync::Arc;

use deadline_chat::{LLMConfig, LlmGenerator};
use deadline_core::ServiceConfig;
use deadline_infer::{create_recognizer, ChronoDateParser};
use deadline_runtime::Extractor;
use deadline_tag::Tagger;
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServiceConfig,
    /// Shared with the LLM generator, which re-reads it on every call.
    pub llm_config: Arc<RwLock<LLMConfig>>,
    pub extractor: Extractor,
}

impl AppState {
    /// Wire the built-in collaborators from configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let llm_config = Arc::new(RwLock::new(LLMConfig::load(
            &config.data_paths.llm_config_file,
        )));

        let tagger = Tagger::new(
            create_recognizer(config.recognizer),
            Arc::new(ChronoDateParser::new()),
        );
        let generator = Arc::new(LlmGenerator::new(Arc::clone(&llm_config)));
        let extractor = Extractor::new(tagger, generator, config.request_timeout())
            .with_all_day_copies(config.all_day_copies);

        Self::from_parts(config, llm_config, extractor)
    }

    /// Assemble state from prebuilt parts (custom collaborators, tests).
    pub fn from_parts(
        config: ServiceConfig,
        llm_config: Arc<RwLock<LLMConfig>>,
        extractor: Extractor,
    ) -> Self {
        Self {
            config,
            llm_config,
            extractor,
        }
    }
}
