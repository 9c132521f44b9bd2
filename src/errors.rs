/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised by a translator when a document could not be translated
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The service answered but produced nothing usable
    #[error("No usable content in translation response: {0}")]
    EmptyResponse(String),
}

/// Configuration-time errors from file selection, fatal before any processing
#[derive(Error, Debug)]
pub enum SelectionError {
    /// The root path does not exist
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The root or the extension set cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Per-file failures, recovered at the candidate boundary
#[derive(Error, Debug)]
pub enum FileError {
    /// Reading the source document failed (missing, unreadable, not UTF-8)
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Source document
        path: PathBuf,
        /// Underlying I/O cause
        source: std::io::Error,
    },

    /// Writing the translated document failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Output document
        path: PathBuf,
        /// Underlying I/O cause
        source: std::io::Error,
    },

    /// The translator failed for this document
    #[error("Translation of {} failed: {source}", path.display())]
    Translation {
        /// Source document
        path: PathBuf,
        /// Underlying translator cause
        source: TranslationError,
    },
}

impl FileError {
    /// The document the failure belongs to
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Translation { path, .. } => path,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration or command line input
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from file selection
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
