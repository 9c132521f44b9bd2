/*!
 * File naming and document I/O utilities.
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default suffix appended to the stem of a translated document
pub const DEFAULT_TRANSLATION_MARKER: &str = "_zh";

/// File operations utility
pub struct FileManager;

impl FileManager {
    /// Whether `path` is an existing file
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Whether `path` is an existing directory
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Stem of a document with any trailing translation marker removed
    ///
    /// Only one marker is removed, so `notes_zh_zh` becomes `notes_zh`.
    pub fn source_stem<P: AsRef<Path>>(path: P, marker: &str) -> String {
        let stem = path.as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match stem.strip_suffix(marker) {
            Some(stripped) if !marker.is_empty() => stripped.to_string(),
            _ => stem,
        }
    }

    /// Whether the file stem already carries the translation marker
    pub fn is_translated_output<P: AsRef<Path>>(path: P, marker: &str) -> bool {
        !marker.is_empty()
            && path.as_ref()
                .file_stem()
                .is_some_and(|s| s.to_string_lossy().ends_with(marker))
    }

    /// Sibling output path for a translated document
    ///
    /// Deriving from an already derived path returns it unchanged.
    pub fn translation_output_path<P: AsRef<Path>>(input_file: P, marker: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        let mut output_filename = Self::source_stem(input_file, marker);
        output_filename.push_str(marker);
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Path used in log lines: relative to `base` when possible, else the file name
    pub fn display_path<P1: AsRef<Path>, P2: AsRef<Path>>(path: P1, base: Option<P2>) -> String {
        let path = path.as_ref();
        if let Some(base) = base {
            if let Ok(relative) = path.strip_prefix(base.as_ref()) {
                return relative.display().to_string();
            }
            return path.display().to_string();
        }

        path.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Read a UTF-8 document to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> std::io::Result<String> {
        fs::read_to_string(path)
    }

    /// Write a string to a file, replacing it atomically
    ///
    /// The content goes to a temporary file in the same directory, which is
    /// renamed over `path` once fully written. A failed write leaves any
    /// previous file untouched and no partial file behind.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;
        Self::copy_permissions(path, temp_file.as_file())?;

        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Give a replacement file the permissions of the file it replaces,
    /// or the usual document mode for a new one
    fn copy_permissions(target: &Path, replacement: &fs::File) -> std::io::Result<()> {
        match fs::metadata(target) {
            Ok(metadata) => replacement.set_permissions(metadata.permissions()),
            #[cfg(unix)]
            Err(_) => {
                use std::os::unix::fs::PermissionsExt;
                replacement.set_permissions(fs::Permissions::from_mode(0o644))
            }
            #[cfg(not(unix))]
            Err(_) => Ok(()),
        }
    }
}
