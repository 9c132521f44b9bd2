/*!
 * Per-document translation decision.
 *
 * For one candidate the orchestrator derives the output path, skips the
 * document when a translation already exists (unless forced) or when it has
 * no content, and otherwise translates and persists it. Existence is checked
 * before the source is read, so already translated documents cost no I/O
 * beyond a stat.
 */

use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::FileError;
use crate::file_utils::FileManager;

use super::Translator;

/// Classification of a successfully handled document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The translation was written
    Translated,
    /// An output already existed and force was off
    SkippedExists,
    /// The source is empty or whitespace only
    SkippedEmpty,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translated => write!(f, "translated"),
            Self::SkippedExists => write!(f, "skipped (translation exists)"),
            Self::SkippedEmpty => write!(f, "skipped (empty file)"),
        }
    }
}

/// Translates single documents with fixed instructions and model
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    /// Suffix appended to output stems
    marker: String,
    /// System prompt sent with every document
    instructions: String,
    /// Model identifier passed to the translator
    model: String,
    /// Directory log paths are shown relative to
    base: Option<PathBuf>,
}

impl DocumentTranslator {
    /// Create a document translator
    pub fn new(marker: impl Into<String>, instructions: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            instructions: instructions.into(),
            model: model.into(),
            base: None,
        }
    }

    /// Show paths relative to `base` in log lines
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Translation marker in use
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Output path of a candidate
    pub fn output_path(&self, candidate: &Path) -> PathBuf {
        FileManager::translation_output_path(candidate, &self.marker)
    }

    /// Path as shown in log lines
    pub fn display(&self, path: &Path) -> String {
        FileManager::display_path(path, self.base.as_deref())
    }

    /// Handle one candidate
    ///
    /// Every failure after the skip-exists check comes back as a `FileError`
    /// naming the candidate; nothing is written unless the translator
    /// succeeded.
    pub async fn process(
        &self,
        candidate: &Path,
        force: bool,
        translator: &dyn Translator,
    ) -> Result<Outcome, FileError> {
        let output_path = self.output_path(candidate);

        if output_path.exists() && !force {
            info!("  Skipped (translation exists): {}", self.display(&output_path));
            return Ok(Outcome::SkippedExists);
        }

        let content = FileManager::read_to_string(candidate).map_err(|source| FileError::Read {
            path: candidate.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            info!("  Skipped (empty file): {}", self.display(candidate));
            return Ok(Outcome::SkippedEmpty);
        }

        info!("  Translating: {} -> {}", self.display(candidate), self.display(&output_path));
        let translated = translator
            .translate(&content, &self.instructions, &self.model)
            .await
            .map_err(|source| FileError::Translation {
                path: candidate.to_path_buf(),
                source,
            })?;

        FileManager::write_to_file(&output_path, &translated).map_err(|source| FileError::Write {
            path: output_path.clone(),
            source,
        })?;

        info!("  Done: {}", self.display(&output_path));
        Ok(Outcome::Translated)
    }
}
