/*!
 * Provider implementations for the remote text-generation services.
 *
 * This module contains client implementations for:
 * - OpenAI: OpenAI chat completions API, or any compatible server
 * - Anthropic: Anthropic messages API
 * - Mock: scriptable in-process provider used by tests
 */

use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Map a non-success HTTP status and body onto a provider error
pub(crate) fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        code => ProviderError::ApiError { status_code: code, message: body },
    }
}

/// Map a transport failure onto a provider error
pub(crate) fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod anthropic;
pub mod mock;
pub mod openai;
