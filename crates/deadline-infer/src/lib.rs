//! Deadline Infer: collaborator capabilities for the tagging pipeline.
//!
//! Provides the `EntityRecognizer` trait (DATE/TIME span detection) and the
//! `DateTimeParser` trait (natural-language date/time resolution).
//! `HeuristicRecognizer` and `ChronoDateParser` are the built-in backends;
//! `NoopRecognizer` leaves all tagging to the regex fallback pass.

pub mod datetime;
pub mod heuristic;
pub mod recognizer;

pub use datetime::{ChronoDateParser, DateTimeParser, ParsedDateTime};
pub use heuristic::HeuristicRecognizer;
pub use recognizer::{EntityRecognizer, NoopRecognizer, Span, SpanLabel};

use std::sync::Arc;

use deadline_core::RecognizerKind;

/// Create the recognizer selected by configuration.
pub fn create_recognizer(kind: RecognizerKind) -> Arc<dyn EntityRecognizer> {
    match kind {
        RecognizerKind::Heuristic => {
            tracing::info!("Using heuristic DATE/TIME recognizer");
            Arc::new(HeuristicRecognizer::new())
        }
        RecognizerKind::None => {
            tracing::info!("Recognizer disabled. Regex fallback tagging only.");
            Arc::new(NoopRecognizer)
        }
    }
}
