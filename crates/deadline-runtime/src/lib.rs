//! Runtime orchestrator for deadline extraction.
//!
//! Runs the tagging pipeline off the async executor, hands the cleaned text
//! to the generative model and validates what comes back, with every
//! collaborator call bounded by the request timeout.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Extractor;
pub use types::*;
