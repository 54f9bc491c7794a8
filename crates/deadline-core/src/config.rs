//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Paths to the extractor's data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        })
    }
}

/// Which entity recognizer backs the tagging pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// Regex-driven DATE/TIME recognizer.
    Heuristic,
    /// No recognizer; only the regex fallback pass tags dates.
    None,
}

impl RecognizerKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "heuristic" => Some(Self::Heuristic),
            "none" | "off" => Some(Self::None),
            _ => None,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Upper bound for each collaborator call within a request.
    pub request_timeout_secs: u64,
    /// CORS allow-list. Empty means permissive.
    pub cors_origins: Vec<String>,
    pub recognizer: RecognizerKind,
    /// Emit an all-day copy before every timed record.
    pub all_day_copies: bool,
}

impl ServiceConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let request_timeout_secs = std::env::var("DEADLINE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&s: &u64| s > 0)
            .unwrap_or(60);

        let cors_origins = std::env::var("DEADLINE_CORS_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let recognizer = match std::env::var("DEADLINE_RECOGNIZER") {
            Ok(value) => RecognizerKind::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown DEADLINE_RECOGNIZER '{}', using heuristic", value);
                RecognizerKind::Heuristic
            }),
            Err(_) => RecognizerKind::Heuristic,
        };

        let all_day_copies = std::env::var("DEADLINE_ALL_DAY_COPIES")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            request_timeout_secs,
            cors_origins,
            recognizer,
            all_day_copies,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:3000/, https://example.github.io ,,");
        assert_eq!(
            origins,
            vec!["http://localhost:3000".to_string(), "https://example.github.io".to_string()]
        );
    }

    #[test]
    fn test_recognizer_kind_parse() {
        assert_eq!(RecognizerKind::parse("Heuristic"), Some(RecognizerKind::Heuristic));
        assert_eq!(RecognizerKind::parse("none"), Some(RecognizerKind::None));
        assert_eq!(RecognizerKind::parse("spacy"), None);
    }

    #[test]
    fn test_data_paths_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested");
        let paths = DataPaths::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(paths.llm_config_file, root.join("llm-config.json"));
    }
}
