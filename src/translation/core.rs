/*!
 * Core translation service implementation.
 *
 * `TranslationService` is the production `Translator`: it owns a configured
 * client for the selected provider and sends one request per document.
 */

use async_trait::async_trait;
use log::debug;
use std::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};

use super::Translator;

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI or compatible chat completions service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Anthropic messages service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Main translation service for document translation
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Self {
        let timeout_secs = config.get_timeout_secs();
        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
        };

        Self { provider, config }
    }

    /// Display name of the active provider
    pub fn provider_name(&self) -> &str {
        self.config.provider.display_name()
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        content: &str,
        instructions: &str,
        model: &str,
    ) -> Result<String, TranslationError> {
        let temperature = self.config.common.temperature;
        let max_tokens = self.config.common.max_tokens;
        let start = Instant::now();

        let (text, stop_reason, tokens) = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                let request = OpenAIRequest::new(model)
                    .add_message("system", instructions)
                    .add_message("user", content)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                let stop_reason = response.choices.first().and_then(|c| c.finish_reason.clone());
                let tokens = response.usage.as_ref()
                    .map(|usage| (usage.prompt_tokens, usage.completion_tokens));
                (OpenAI::extract_text(&response), stop_reason, tokens)
            },
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, max_tokens)
                    .system(instructions)
                    .add_message("user", content)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                let stop_reason = response.stop_reason.clone();
                let tokens = Some((
                    u64::from(response.usage.input_tokens),
                    u64::from(response.usage.output_tokens),
                ));
                (Anthropic::extract_text(&response), stop_reason, tokens)
            },
        };

        debug!(
            "{} answered in {:.1}s ({} chars, stop reason: {})",
            self.provider_name(),
            start.elapsed().as_secs_f64(),
            text.len(),
            stop_reason.as_deref().unwrap_or("unknown")
        );
        if let Some((input_tokens, output_tokens)) = tokens {
            debug!("Token usage: {} in, {} out", input_tokens, output_tokens);
        }

        if text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse(format!(
                "{} returned no text",
                self.provider_name()
            )));
        }

        Ok(text)
    }
}
