//! Generative model access with external LLM streaming.
//!
//! Tagged listing text goes in as a chat prompt, draft JSON text comes out.
//! LLM calls go to external APIs; no local model required.

pub mod config;
pub mod generator;
pub mod prompt;
pub mod providers;
pub mod types;

pub use config::LLMConfig;
pub use generator::{LlmGenerator, TextGenerator};
pub use prompt::build_messages;
pub use types::*;
