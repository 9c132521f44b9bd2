/*!
 * Document translation.
 *
 * This module contains the translation pipeline, split into:
 *
 * - `core`: the `Translator` collaborator and the provider-backed service
 * - `orchestrator`: the per-document decision (skip, translate, persist)
 * - `batch`: the sequential batch driver and run summary
 */

use async_trait::async_trait;

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::mock::{MockProvider, MockRequest};

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, PreviewEntry, RunSummary};
pub use self::core::TranslationService;
pub use self::orchestrator::{DocumentTranslator, Outcome};

// Submodules
pub mod batch;
pub mod core;
pub mod orchestrator;

/// A capability that turns a whole document into its translation
///
/// `instructions` is the system prompt, `content` the raw document body. The
/// returned text is written as-is; implementations fail when the remote call
/// errors or yields no usable content.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        content: &str,
        instructions: &str,
        model: &str,
    ) -> Result<String, TranslationError>;
}

#[async_trait]
impl Translator for MockProvider {
    async fn translate(
        &self,
        content: &str,
        instructions: &str,
        model: &str,
    ) -> Result<String, TranslationError> {
        let request = MockRequest {
            content: content.to_string(),
            instructions: instructions.to_string(),
            model: model.to_string(),
        };

        let response = self.complete(request).await?;
        let text = MockProvider::extract_text(&response);
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse("mock returned no text".to_string()));
        }
        Ok(text)
    }
}
