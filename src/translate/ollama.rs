use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OllamaConfig;
use crate::error::{MsglocError, Result};
use super::TranslationCapability;
use super::common::{build_client, check_distinct_locales, read_json, send};

const BACKEND: &str = "ollama";

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TranslationResult {
    text: String,
}

/// Translation through a local Ollama model
pub struct OllamaTranslator {
    client: Client,
    config: OllamaConfig,
}

impl OllamaTranslator {
    pub fn new(config: OllamaConfig, timeout_secs: u64) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(MsglocError::Config("ollama.model is not set".to_string()));
        }
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
        })
    }

    /// Build translation prompt, asking for JSON output
    fn build_prompt(&self, text: &str, src_locale: &str, dst_locale: &str) -> String {
        let source_name = language_code_to_name(src_locale);
        let target_name = language_code_to_name(dst_locale);
        format!(
            "You are a professional translator localizing a browser extension.\n\
             \n\
             Translate the text from {} to {} ONLY (language code: {}).\n\
             The text is a fragment of a user interface message; translate it as a fragment.\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            source_name, target_name, dst_locale, target_name, text
        )
    }
}

#[async_trait]
impl TranslationCapability for OllamaTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn is_supported(&self, _src_locale: &str, _dst_locale: &str) -> Result<bool> {
        Ok(true)
    }

    async fn translate(&self, text: &str, src_locale: &str, dst_locale: &str) -> Result<String> {
        check_distinct_locales(src_locale, dst_locale)?;

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: self.build_prompt(text.trim(), src_locale, dst_locale),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!("Sending translation request to: {}", url);

        let response: GenerateResponse =
            read_json(BACKEND, send(BACKEND, self.client.post(&url).json(&request)).await?).await?;
        let raw_response = response.response.trim();
        debug!("Raw Ollama response: {}", raw_response);

        if raw_response.is_empty() {
            return Err(MsglocError::Upstream("Empty translation received".to_string()));
        }

        let translated = match serde_json::from_str::<TranslationResult>(raw_response) {
            Ok(result) => result.text.trim().to_string(),
            Err(_) => clean_translation_response(raw_response),
        };
        Ok(restore_surrounding_whitespace(text, &translated))
    }
}

/// Models drop leading and trailing whitespace; segments between tags depend on it
fn restore_surrounding_whitespace(original: &str, translated: &str) -> String {
    let core = original.trim();
    if core.is_empty() {
        return original.to_string();
    }
    let start = original.len() - original.trim_start().len();
    let end = start + core.len();
    format!("{}{}{}", &original[..start], translated.trim(), &original[end..])
}

/// Convert language code to full language name for clearer prompts
fn language_code_to_name(code: &str) -> String {
    let primary = super::common::primary_language(code);
    let name = match primary.as_str() {
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "ru" => "Russian",
        "it" => "Italian",
        "pt" => "Portuguese",
        "pl" => "Polish",
        "nl" => "Dutch",
        "tr" => "Turkish",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "id" => "Indonesian",
        "sv" => "Swedish",
        "da" => "Danish",
        "no" | "nb" => "Norwegian",
        "fi" => "Finnish",
        "he" => "Hebrew",
        "hu" => "Hungarian",
        "cs" => "Czech",
        "uk" => "Ukrainian",
        "en" => "English",
        _ => return code.to_string(),
    };
    match (primary.as_str(), super::common::api_language_code(code).as_str()) {
        ("zh", "zh-TW") => "Traditional Chinese".to_string(),
        ("zh", _) => "Simplified Chinese".to_string(),
        _ => name.to_string(),
    }
}

/// Clean up a free-form response to extract just the translation
fn clean_translation_response(response: &str) -> String {
    let lines: Vec<&str> = response.lines().collect();

    for &line in &lines {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("Here are")
            || trimmed.starts_with("Option")
            || trimmed.starts_with("**Option")
            || trimmed.starts_with("Translation:")
            || trimmed.starts_with("- ")
            || trimmed.starts_with("* ")
        {
            continue;
        }

        if trimmed.starts_with("**") && trimmed.ends_with("**") {
            continue;
        }

        return trimmed.to_string();
    }

    response.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_surrounding_whitespace() {
        assert_eq!(restore_surrounding_whitespace("Hello ", "Bonjour"), "Bonjour ");
        assert_eq!(restore_surrounding_whitespace("\n  Hello", " Bonjour\n"), "\n  Bonjour");
        assert_eq!(restore_surrounding_whitespace("  ", "x"), "  ");
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_code_to_name("ko"), "Korean");
        assert_eq!(language_code_to_name("pt_BR"), "Portuguese");
        assert_eq!(language_code_to_name("zh_TW"), "Traditional Chinese");
        assert_eq!(language_code_to_name("zh_CN"), "Simplified Chinese");
        assert_eq!(language_code_to_name("xx"), "xx");
    }

    #[test]
    fn test_clean_translation_response() {
        let response = "Here are some options:\n\n**Option 1**\nBonjour le monde\n- alt";
        assert_eq!(clean_translation_response(response), "Bonjour le monde");
    }

    #[test]
    fn test_prompt_mentions_both_languages() {
        let translator = OllamaTranslator::new(OllamaConfig::default(), 5).unwrap();
        let prompt = translator.build_prompt("Save tabs", "en", "ja");
        assert!(prompt.contains("from English to Japanese"));
        assert!(prompt.contains("Save tabs"));
    }
}
