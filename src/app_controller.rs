/*!
 * Application controller for document translation runs.
 */

use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_selector::FileSelector;
use crate::file_utils::FileManager;
use crate::translation::{BatchTranslator, DocumentTranslator, PreviewEntry, RunSummary, Translator};

/// Per-invocation run settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Overwrite existing translations
    pub force: bool,
    /// Search subdirectories
    pub recursive: bool,
    /// Eligible extensions, dot-prefixed
    pub extensions: BTreeSet<String>,
    /// Only report what would be translated
    pub dry_run: bool,
}

impl RunOptions {
    /// Options taken from the configuration, no force, no dry run
    pub fn from_config(config: &Config) -> Self {
        Self {
            force: false,
            recursive: config.recursive,
            extensions: config.extension_set(),
            dry_run: false,
        }
    }
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// Nothing matched the selection
    NoCandidates,
    /// Dry run listing
    Preview(Vec<PreviewEntry>),
    /// Translation batch counts
    Translated(RunSummary),
}

/// Main application controller for document translation
pub struct Controller {
    /// App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Select candidates under `root` and either preview or translate them
    ///
    /// Selection errors (missing root, unsupported single file) are returned
    /// before anything is processed. Per-document failures never are; they
    /// only show up in the summary counts. `translator` may be `None` for a
    /// dry run.
    pub async fn run(
        &self,
        root: &Path,
        options: &RunOptions,
        translator: Option<&dyn Translator>,
    ) -> Result<RunReport, AppError> {
        let root = Self::resolve_root(root);
        let marker = self.config.marker();
        let selector = FileSelector::new(
            marker.clone(),
            self.config.excluded_dirs.iter().cloned(),
        );

        let candidates = selector.select(&root, options.recursive, &options.extensions)?;
        debug!("Selected {} candidate(s) under {}", candidates.len(), root.display());

        if candidates.is_empty() {
            info!("No files found to translate.");
            return Ok(RunReport::NoCandidates);
        }

        let model = self.config.translation.get_model();
        info!("Found {} file(s) to process", candidates.len());
        info!("Extensions: {}", options.extensions.iter().cloned().collect::<Vec<_>>().join(", "));
        info!("Model: {}", model);
        info!("{}", "-".repeat(50));

        let instructions = self.config.system_instructions()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        let mut documents = DocumentTranslator::new(
            marker,
            instructions,
            model,
        );
        if FileManager::dir_exists(&root) {
            documents = documents.with_base(root.clone());
        }
        let batch = BatchTranslator::new(documents);

        if options.dry_run {
            info!("DRY RUN - No translations will be performed");
            info!("{}", "-".repeat(50));
            let preview = batch.preview(&candidates);
            for entry in &preview {
                info!("  [{}] {}", entry.status(), batch.display(&entry.path));
            }
            return Ok(RunReport::Preview(preview));
        }

        let translator = translator.ok_or_else(|| {
            AppError::Config("A translator is required unless running in dry-run mode".to_string())
        })?;

        let progress_bar = Self::progress_bar(candidates.len());
        let pb = progress_bar.clone();
        let summary = batch.run(&candidates, options.force, translator, move |completed, _total| {
            pb.set_position(completed as u64);
        }).await;
        progress_bar.finish_and_clear();

        info!("{}", "-".repeat(50));
        info!("{}", summary);
        info!("Completed in {}", Self::format_duration(summary.duration));

        Ok(RunReport::Translated(summary))
    }

    /// Absolute form of the root, left unchanged when it cannot be resolved
    fn resolve_root(root: &Path) -> PathBuf {
        std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
    }

    fn progress_bar(total: usize) -> ProgressBar {
        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
