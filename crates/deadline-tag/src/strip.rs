//! Removal of ignore-marked content once tagging is complete.

use once_cell::sync::Lazy;
use regex::Regex;

static IGNORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<IGNORE>.*?</IGNORE>").unwrap());

/// Delete every `<IGNORE>...</IGNORE>` region, then drop blank lines.
pub fn strip_ignored(text: &str) -> String {
    let without = IGNORE_RE.replace_all(text, "");
    without
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_regions_and_blank_lines() {
        let text = "<ASSIGNMENT>\n<ASSIGNMENT_NAME>Readme</ASSIGNMENT_NAME>\n<IGNORE>Not available until Sep 3</IGNORE>\n\nDue <DUE><DATE>2024-09-16</DATE></DUE></ASSIGNMENT>";
        assert_eq!(
            strip_ignored(text),
            "<ASSIGNMENT>\n<ASSIGNMENT_NAME>Readme</ASSIGNMENT_NAME>\nDue <DUE><DATE>2024-09-16</DATE></DUE></ASSIGNMENT>"
        );
    }

    #[test]
    fn test_region_spanning_lines() {
        assert_eq!(strip_ignored("keep\n<IGNORE>a\nb</IGNORE>\nalso"), "keep\nalso");
    }

    #[test]
    fn test_idempotent() {
        let text = "a\n<IGNORE>x</IGNORE>\n\n  \nb <IGNORE>y</IGNORE> c\n";
        let once = strip_ignored(text);
        assert_eq!(once, "a\nb  c");
        assert_eq!(strip_ignored(&once), once);
    }
}
