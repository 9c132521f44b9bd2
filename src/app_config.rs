use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::file_selector::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXTENSIONS, normalize_extensions};
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and overriding configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO, optionally with a script or region subtag)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Suffix appended to the stem of translated documents, derived from
    /// `target_language` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_marker: Option<String>,

    /// Eligible file extensions
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never searched for documents
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// Whether directories are searched recursively
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// OpenAI or any chat-completions compatible server
    #[default]
    OpenAI,
    /// Anthropic
    Anthropic,
}

impl TranslationProvider {
    /// Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    /// Environment variables naming the model, in lookup order
    pub fn model_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &["OPENAI_MODEL"],
            Self::Anthropic => &[],
        }
    }

    /// Environment variables holding the API key, in lookup order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &["OPENAI_API_KEY"],
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    /// Environment variables holding the service base URL, in lookup order
    pub fn base_url_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &["OPENAI_API_BASE", "OPENAI_BASE_URL"],
            Self::Anthropic => &["ANTHROPIC_BASE_URL"],
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model name
    #[serde(default = "String::new")]
    pub model: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Provider config with the defaults of `provider_type`
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Provider settings given explicitly, e.g. on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOverrides {
    /// Model identifier
    pub model: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Service base URL
    pub base_url: Option<String>,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a translated document
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::OpenAI),
        ProviderConfig::new(TranslationProvider::Anthropic),
    ]
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    16384
}

fn default_true() -> bool {
    true
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Your ONLY task is to translate the provided document from {source_language} to {target_language}.

CRITICAL RULES:
1. This is a TRANSLATION task - translate the ENTIRE document
2. DO NOT generate new content, code examples, or explanations
3. DO NOT summarize or truncate the document
4. DO NOT add any commentary or notes
5. Output ONLY the complete translated document

## Formatting Rules:
- Preserve ALL markdown/text formatting exactly (headers, code blocks, lists, etc.)
- Keep code snippets, URLs, file paths, and technical terms untranslated
- Keep placeholder variables like {variable} or {{placeholder}} unchanged
- Maintain original line breaks and structure

## Translation Style:
- Use natural, fluent {target_language}
- Maintain the original tone and style

Now translate the following document completely:".to_string()
}

impl Config {
    /// Load a configuration from a JSON file, falling back to defaults for missing fields
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Suffix marking translated documents
    ///
    /// Without an explicit `translation_marker` it follows the target
    /// language, so `zh` gives `_zh` and `pt-BR` gives `_pt_br`.
    pub fn marker(&self) -> String {
        match &self.translation_marker {
            Some(marker) => marker.clone(),
            None => format!("_{}", self.target_language.trim().to_lowercase().replace('-', "_")),
        }
    }

    /// Normalized, dot-prefixed extension set
    pub fn extension_set(&self) -> std::collections::BTreeSet<String> {
        normalize_extensions(&self.extensions)
    }

    /// Validate the configuration for consistency and required values
    ///
    /// API keys are not checked here, a dry run never contacts a provider.
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        if self.source_language.trim().eq_ignore_ascii_case(self.target_language.trim()) {
            return Err(anyhow!(
                "Source and target language are both '{}'",
                self.source_language
            ));
        }

        if self.marker().trim().is_empty() {
            return Err(anyhow!("Translation marker must not be empty"));
        }

        if self.extension_set().is_empty() {
            return Err(anyhow!("At least one file extension is required"));
        }

        let endpoint = self.translation.get_endpoint();
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", endpoint))?;

        Ok(())
    }

    /// Validate the settings needed to actually call the provider
    pub fn validate_for_translation(&self) -> Result<()> {
        self.validate()?;

        if self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        if self.translation.get_model().trim().is_empty() {
            return Err(anyhow!("A model identifier is required"));
        }

        Ok(())
    }

    /// Render the system prompt with language names
    pub fn system_instructions(&self) -> Result<String> {
        let source = language_utils::get_language_name(&self.source_language)?;
        let target = language_utils::get_language_name(&self.target_language)?;

        Ok(self.translation.common.system_prompt
            .replace("{source_language}", &source)
            .replace("{target_language}", &target))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation_marker: None,
            extensions: default_extensions(),
            excluded_dirs: default_excluded_dirs(),
            recursive: true,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the active provider configuration, adding a default entry when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Apply explicit settings and the active provider's environment variables
    ///
    /// An explicit value wins over the environment, which wins over the
    /// configured value. Only the variables of the active provider are read.
    /// Empty values count as unset.
    pub fn apply_overrides<F>(&mut self, overrides: &ProviderOverrides, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = self.provider.clone();
        let lookup = |names: &[&str], explicit: &Option<String>| {
            explicit.clone()
                .into_iter()
                .chain(names.iter().filter_map(|&name| env(name)))
                .find(|value| !value.trim().is_empty())
        };

        let model = lookup(provider.model_env_vars(), &overrides.model);
        let api_key = lookup(provider.api_key_env_vars(), &overrides.api_key);
        let base_url = lookup(provider.base_url_env_vars(), &overrides.base_url);

        let provider_config = self.active_provider_config_mut();
        if let Some(model) = model {
            provider_config.model = model;
        }
        if let Some(api_key) = api_key {
            provider_config.api_key = api_key;
        }
        if let Some(base_url) = base_url {
            provider_config.endpoint = base_url;
        }
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            common: TranslationCommonConfig::default(),
        }
    }
}
