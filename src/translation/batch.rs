/*!
 * Batch translation processing.
 *
 * Candidates are handled one at a time, in selection order. Each document has
 * its own error boundary: a failure is logged and counted and the batch moves
 * on to the next candidate.
 */

use log::error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::errors::FileError;

use super::Translator;
use super::orchestrator::{DocumentTranslator, Outcome};

/// Aggregate counts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents translated and written
    pub translated: usize,
    /// Documents skipped because an output existed
    pub skipped_exists: usize,
    /// Documents skipped because they were empty
    pub skipped_empty: usize,
    /// Documents that failed
    pub errors: usize,
    /// Wall time of the batch
    pub duration: Duration,
}

impl RunSummary {
    /// Record the result of one document
    pub fn record(&mut self, result: &Result<Outcome, FileError>) {
        match result {
            Ok(Outcome::Translated) => self.translated += 1,
            Ok(Outcome::SkippedExists) => self.skipped_exists += 1,
            Ok(Outcome::SkippedEmpty) => self.skipped_empty += 1,
            Err(_) => self.errors += 1,
        }
    }

    /// Skipped documents of either kind
    pub fn skipped(&self) -> usize {
        self.skipped_exists + self.skipped_empty
    }

    /// Total documents seen
    pub fn total(&self) -> usize {
        self.translated + self.skipped() + self.errors
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} translated, {} skipped, {} errors",
            self.translated,
            self.skipped(),
            self.errors
        )
    }
}

/// One line of a dry-run preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    /// Candidate document
    pub path: PathBuf,
    /// Where its translation goes
    pub output_path: PathBuf,
    /// Whether that output exists now
    pub exists: bool,
}

impl PreviewEntry {
    /// Status label shown in dry-run output
    pub fn status(&self) -> &'static str {
        if self.exists { "exists" } else { "needs translation" }
    }
}

/// Sequential batch driver over a candidate list
pub struct BatchTranslator {
    /// Per-document handler
    documents: DocumentTranslator,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(documents: DocumentTranslator) -> Self {
        Self { documents }
    }

    /// The per-document handler
    pub fn documents(&self) -> &DocumentTranslator {
        &self.documents
    }

    /// Translate every candidate in order
    ///
    /// `progress_callback` receives `(completed, total)` after each document.
    pub async fn run(
        &self,
        candidates: &[PathBuf],
        force: bool,
        translator: &dyn Translator,
        mut progress_callback: impl FnMut(usize, usize),
    ) -> RunSummary {
        let start = Instant::now();
        let total = candidates.len();
        let mut summary = RunSummary::default();

        for (index, candidate) in candidates.iter().enumerate() {
            let result = self.documents.process(candidate, force, translator).await;

            if let Err(e) = &result {
                let cause = std::error::Error::source(e)
                    .map(|source| source.to_string())
                    .unwrap_or_else(|| e.to_string());
                error!("  Error translating {}: {}", self.documents.display(candidate), cause);
            }

            summary.record(&result);
            progress_callback(index + 1, total);
        }

        summary.duration = start.elapsed();
        summary
    }

    /// Report, without translating, which candidates already have an output
    pub fn preview(&self, candidates: &[PathBuf]) -> Vec<PreviewEntry> {
        candidates.iter()
            .map(|path| {
                let output_path = self.documents.output_path(path);
                PreviewEntry {
                    exists: output_path.exists(),
                    path: path.clone(),
                    output_path,
                }
            })
            .collect()
    }

    /// Path as shown in log lines
    pub fn display(&self, path: &Path) -> String {
        self.documents.display(path)
    }
}
