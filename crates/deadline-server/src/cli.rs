//! Offline CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use deadline_core::RecognizerKind;
use deadline_infer::{create_recognizer, ChronoDateParser};
use deadline_tag::{strip_ignored, Tagger};

/// Tag `input` with the built-in collaborators. Returns (tagged, cleaned).
pub fn tag_text(input: &str, recognizer: RecognizerKind) -> anyhow::Result<(String, String)> {
    let tagger = Tagger::new(create_recognizer(recognizer), Arc::new(ChronoDateParser::new()));
    let tagged = tagger.tag(input)?;
    let cleaned = strip_ignored(&tagged);
    Ok((tagged, cleaned))
}

/// `deadline tag [file]`: reads the file, or stdin when no path is given.
pub fn run_tag(path: Option<&Path>, recognizer: RecognizerKind) -> anyhow::Result<()> {
    let input = match path {
        Some(p) => std::fs::read_to_string(p)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (tagged, cleaned) = tag_text(&input, recognizer)?;
    println!("--- tagged ---");
    println!("{}", tagged);
    println!("--- cleaned ---");
    println!("{}", cleaned);
    Ok(())
}

pub fn print_help() {
    println!("deadline: assignment deadline extraction server");
    println!();
    println!("Usage: deadline [command]");
    println!();
    println!("Commands:");
    println!("  (none)           Start the server");
    println!("  tag [file]       Print tagged and cleaned text for a file or stdin");
    println!("  help             Show this help message");
}
