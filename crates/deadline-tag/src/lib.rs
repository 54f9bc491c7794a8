//! Deadline Tag: turns a pasted course listing into tagged item blocks.
//!
//! Pipeline per block: line classification (title / ignore markup),
//! recognizer spans merged into due candidates, offset-safe replacement,
//! regex fallback tagging, and due deduplication. Blocks are wrapped in
//! `<ASSIGNMENT>` markers and joined; `strip_ignored` then removes the
//! suppressed lines before the text goes to prompt assembly.

pub mod block;
pub mod dedup;
pub mod fallback;
pub mod lines;
pub mod markup;
pub mod merge;
pub mod replace;
pub mod segment;
pub mod strip;

pub use block::{Block, TaggedBlock};
pub use markup::{Region, RegionKind, TaggedRegions};
pub use merge::DueCandidate;
pub use replace::{replace_spans, Replacement, Rewrite};
pub use segment::{split_blocks, Tagger};
pub use strip::strip_ignored;
