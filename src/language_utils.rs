use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the language codes used in prompts
///
/// Codes are ISO 639-1 (2-letter) or ISO 639-3 (3-letter), optionally followed
/// by a script or region subtag (`zh-Hant`, `pt-BR`).

/// A language code split into its primary language and optional subtag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag {
    /// ISO 639-3 code of the primary language
    pub primary: String,
    /// Script or region subtag, lowercased
    pub subtag: Option<String>,
}

/// Parse and validate a language code
pub fn parse_language_tag(code: &str) -> Result<LanguageTag> {
    let normalized = code.trim().to_lowercase().replace('_', "-");
    let mut parts = normalized.splitn(2, '-');
    let primary = parts.next().unwrap_or_default();

    let lang = match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    let subtag = parts.next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(LanguageTag {
        primary: lang.to_639_3().to_string(),
        subtag,
    })
}

/// Validate a language code
pub fn validate_language_code(code: &str) -> Result<()> {
    parse_language_tag(code).map(|_| ())
}

/// Get the English language name used in translation prompts
///
/// Chinese is qualified by script: bare `zh` and mainland/Singapore variants
/// are Simplified, Taiwan/Hong Kong/Macau variants are Traditional.
pub fn get_language_name(code: &str) -> Result<String> {
    let tag = parse_language_tag(code)?;
    let lang = Language::from_639_3(&tag.primary)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", tag.primary))?;
    let name = lang.to_name();

    if tag.primary == "zho" {
        let traditional = matches!(tag.subtag.as_deref(), Some("hant" | "tw" | "hk" | "mo"));
        let qualifier = if traditional { "Traditional" } else { "Simplified" };
        return Ok(format!("{} {}", qualifier, name));
    }

    Ok(match tag.subtag {
        Some(subtag) => format!("{} ({})", name, subtag.to_uppercase()),
        None => name.to_string(),
    })
}
