/*!
 * # doctran - batch document translation with AI
 *
 * A Rust library for translating trees of text documents with AI providers.
 * Each translation is written next to its source with a marker in the file
 * name (`guide.md` -> `guide_zh.md`), which also makes re-runs idempotent.
 *
 * ## Features
 *
 * - Deterministic candidate selection over a file or a directory tree
 * - Skips documents already translated, unless forced
 * - Per-document error isolation within a batch
 * - Dry-run preview without contacting a provider
 * - OpenAI (and compatible servers) and Anthropic providers
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `file_selector`: Candidate selection
 * - `file_utils`: Output naming and document I/O
 * - `translation`: Translation pipeline:
 *   - `translation::core`: `Translator` trait implementation over providers
 *   - `translation::orchestrator`: Per-document skip/translate/persist decision
 *   - `translation::batch`: Sequential batch driver and run summary
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for LLM providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_selector;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunReport};
pub use errors::{AppError, FileError, ProviderError, SelectionError, TranslationError};
pub use file_selector::FileSelector;
pub use file_utils::FileManager;
pub use translation::{Outcome, RunSummary, TranslationService, Translator};
