//! Extractor: tag → strip → prompt → generate → postprocess.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Datelike;
use tracing::{debug, info};

use deadline_chat::{build_messages, TextGenerator};
use deadline_core::{Error, Result};
use deadline_records::{with_all_day_copies, RecordPostprocessor};
use deadline_tag::{strip_ignored, Tagger};

use crate::types::*;

/// Coordinates one extraction request across the injected collaborators.
pub struct Extractor {
    tagger: Tagger,
    postprocessor: RecordPostprocessor,
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    all_day_copies: bool,
}

impl Extractor {
    /// The postprocessor shares the tagger's date parser.
    pub fn new(tagger: Tagger, generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        let postprocessor = RecordPostprocessor::new(tagger.parser());
        Self {
            tagger,
            postprocessor,
            generator,
            timeout,
            all_day_copies: false,
        }
    }

    /// Emit an all-day copy before each timed record.
    pub fn with_all_day_copies(mut self, enabled: bool) -> Self {
        self.all_day_copies = enabled;
        self
    }

    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Run the deterministic pipeline only.
    pub async fn preview(&self, text: &str) -> Result<TagPreview> {
        let tagger = self.tagger.clone();
        let owned = text.to_string();
        let tagged = self
            .bounded("tagging", async move {
                tokio::task::spawn_blocking(move || tagger.tag(&owned))
                    .await
                    .map_err(|e| Error::Internal(format!("Tagging task failed: {}", e)))?
            })
            .await?;
        let cleaned = strip_ignored(&tagged);
        Ok(TagPreview { tagged, cleaned })
    }

    /// Extract validated records from pasted listing text.
    pub async fn extract(&self, text: &str) -> Result<ExtractionOutcome> {
        let start = Instant::now();
        let TagPreview { tagged, cleaned } = self.preview(text).await?;

        if cleaned.trim().is_empty() {
            debug!("Nothing to extract after tagging");
            return Ok(ExtractionOutcome {
                records: Vec::new(),
                tagged_text: tagged,
                model_called: false,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        // Same reference as the parser so replays see a consistent year
        let year = self.tagger.parser().reference_date().year();
        let messages = build_messages(&cleaned, year);
        let draft = self
            .bounded("generation", self.generator.generate(messages))
            .await?;
        debug!("Model returned {} bytes", draft.len());

        let mut records = self.postprocessor.process(&draft);
        if self.all_day_copies {
            records = with_all_day_copies(records);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("Extracted {} record(s) in {}ms", records.len(), duration_ms);

        Ok(ExtractionOutcome {
            records,
            tagged_text: tagged,
            model_called: true,
            duration_ms,
        })
    }

    async fn bounded<T>(&self, stage: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, fut).await.map_err(|_| {
            Error::Timeout(format!("{} exceeded {}s", stage, self.timeout.as_secs_f64()))
        })?
    }
}
