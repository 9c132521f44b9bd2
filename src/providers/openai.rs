use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, status_error, transport_error};

/// OpenAI client for the chat completions API
///
/// Any server speaking the same protocol (Azure proxies, LM Studio, vLLM)
/// works by pointing `endpoint` at its `/v1` base URL.
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u64,
    /// Tokens in the completion
    pub completion_tokens: u64,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message; content may be null for refusals or tool calls
    pub message: OpenAIResponseMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message returned in a choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponseMessage {
    /// Role of the author
    pub role: String,
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completions response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    /// Completion choices, the first one is used
    pub choices: Vec<OpenAIChoice>,
    /// Token usage, absent on some compatible servers
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl Default for OpenAIRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            temperature: None,
        }
    }
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The messages added so far
    pub fn messages(&self) -> &[OpenAIMessage] {
        &self.messages
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Full URL of the chat completions route
    pub fn completions_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let url = self.completions_url();
        debug!("POST {} (model {}, {} messages)", url, request.model, request.messages().len());

        let response = self.client.post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response.choices.first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
