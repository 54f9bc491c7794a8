//! Deadline Records: strict assignment records from loose model output.
//!
//! The generative model is asked for a JSON array but may wrap it in prose,
//! code fences, or truncate it. `RecordPostprocessor` recovers what it can,
//! re-validates every date/time field through the date parser, and never
//! fails the batch over a single bad item.

pub mod postprocess;
pub mod types;

pub use postprocess::{with_all_day_copies, RecordPostprocessor, UNAVAILABLE_PHRASE};
pub use types::*;
