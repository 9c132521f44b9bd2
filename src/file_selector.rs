/*!
 * Candidate selection for a translation run.
 *
 * Given a root (file or directory), a recursion flag and a set of eligible
 * extensions, the selector produces the ordered, deduplicated list of source
 * documents to process. Translated outputs, excluded directories and hidden
 * paths never make it into the list.
 */

use log::{debug, warn};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::SelectionError;
use crate::file_utils::{DEFAULT_TRANSLATION_MARKER, FileManager};

/// Directories that never hold source documents
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".github",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "openspec",
    ".claude",
    ".cccc",
];

/// Extensions translated when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &[".md", ".txt"];

/// Normalize user supplied extensions into a dot-prefixed set
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions.into_iter()
        .map(|ext| ext.as_ref().trim().to_string())
        .filter(|ext| !ext.is_empty() && ext != ".")
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{}", ext) })
        .collect()
}

/// Selects the documents of a run
#[derive(Debug, Clone)]
pub struct FileSelector {
    /// Suffix identifying translated outputs
    marker: String,
    /// Directory names skipped during traversal
    excluded_dirs: BTreeSet<String>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSLATION_MARKER, DEFAULT_EXCLUDED_DIRS.iter().copied())
    }
}

impl FileSelector {
    /// Create a selector for the given marker and directory denylist
    pub fn new<I, S>(marker: impl Into<String>, excluded_dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            marker: marker.into(),
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// The translation marker this selector filters on
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Select the candidates under `root`
    ///
    /// A file root is returned as-is once its extension is accepted. A
    /// directory root is walked (only its immediate entries unless
    /// `recursive`), and the result is sorted by full path.
    pub fn select(
        &self,
        root: &Path,
        recursive: bool,
        extensions: &BTreeSet<String>,
    ) -> Result<Vec<PathBuf>, SelectionError> {
        if extensions.is_empty() {
            return Err(SelectionError::InvalidInput(
                "at least one file extension is required".to_string(),
            ));
        }

        if FileManager::file_exists(root) {
            if !Self::has_extension(root, extensions) {
                return Err(SelectionError::InvalidInput(format!(
                    "{} has extension {}, expected one of {}",
                    root.display(),
                    Self::suffix_of(root),
                    extensions.iter().cloned().collect::<Vec<_>>().join(", ")
                )));
            }
            return Ok(vec![root.to_path_buf()]);
        }

        if !FileManager::dir_exists(root) {
            return Err(SelectionError::NotFound(root.to_path_buf()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut candidates = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .max_depth(max_depth)
            .into_iter()
            // Pruning here drops whole excluded or hidden subtrees, root excepted
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_segment(entry.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !Self::has_extension(path, extensions) {
                continue;
            }

            if FileManager::is_translated_output(path, &self.marker) {
                debug!("Ignoring translated output: {}", path.display());
                continue;
            }

            candidates.insert(path.to_path_buf());
        }

        Ok(candidates.into_iter().collect())
    }

    /// Whether a single path segment is hidden or on the denylist
    fn is_excluded_segment(&self, segment: &OsStr) -> bool {
        let segment = segment.to_string_lossy();
        segment.starts_with('.') || self.excluded_dirs.contains(&*segment)
    }

    fn has_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        extensions.iter().any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
    }

    fn suffix_of(path: &Path) -> String {
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| "(none)".to_string())
    }
}
