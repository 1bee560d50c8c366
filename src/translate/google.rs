use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::GoogleConfig;
use crate::error::{MsglocError, Result};
use super::TranslationCapability;
use super::common::{api_language_code, build_client, check_distinct_locales, check_payload, primary_language, read_json, require_credential, send};

const BACKEND: &str = "google";
const CHAR_LIMIT: usize = 30_000;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    languages: Vec<Language>,
}

#[derive(Debug, Deserialize)]
struct Language {
    language: String,
}

/// Google Cloud Translation (basic edition) over REST with an API key
pub struct GoogleTranslator {
    client: Client,
    config: GoogleConfig,
    languages: OnceCell<Vec<String>>,
}

impl GoogleTranslator {
    pub fn new(config: GoogleConfig, timeout_secs: u64) -> Result<Self> {
        require_credential(BACKEND, "api_key (GOOGLE_API_KEY)", &config.api_key)?;
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
            languages: OnceCell::new(),
        })
    }

    /// Supported language codes, fetched once per instance
    async fn languages(&self) -> Result<&Vec<String>> {
        self.languages
            .get_or_try_init(|| async {
                let url = format!("{}/languages", self.config.endpoint);
                let request = self.client.get(&url).query(&[("key", self.config.api_key.as_str())]);
                let envelope: Envelope<LanguagesData> =
                    read_json(BACKEND, send(BACKEND, request).await?).await?;
                let codes: Vec<String> = envelope.data.languages.into_iter().map(|l| l.language).collect();
                info!("Google Translation supports {} languages", codes.len());
                Ok::<_, MsglocError>(codes)
            })
            .await
    }
}

fn code_listed(codes: &[String], locale: &str) -> bool {
    let full = api_language_code(locale);
    let primary = primary_language(locale);
    codes.iter().any(|code| code.eq_ignore_ascii_case(&full) || code.eq_ignore_ascii_case(&primary))
}

#[async_trait]
impl TranslationCapability for GoogleTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn is_supported(&self, src_locale: &str, dst_locale: &str) -> Result<bool> {
        let codes = self.languages().await?;
        Ok(code_listed(codes, src_locale) && code_listed(codes, dst_locale))
    }

    async fn translate(&self, text: &str, src_locale: &str, dst_locale: &str) -> Result<String> {
        check_payload(text, CHAR_LIMIT)?;
        check_distinct_locales(src_locale, dst_locale)?;

        let source = api_language_code(src_locale);
        let target = api_language_code(dst_locale);
        debug!("Google {} -> {}: {}", source, target, text);

        let body = TranslateRequest {
            q: text,
            source: &source,
            target: &target,
            format: "text",
        };
        let request = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body);

        let envelope: Envelope<TranslationsData> = read_json(BACKEND, send(BACKEND, request).await?).await?;
        envelope
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| MsglocError::Upstream("google returned no translations".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_listed() {
        let codes = vec!["en".to_string(), "ko".to_string(), "zh-TW".to_string()];
        assert!(code_listed(&codes, "en_GB"));
        assert!(code_listed(&codes, "zh_TW"));
        assert!(!code_listed(&codes, "fr"));
    }

    #[test]
    fn test_response_shapes() {
        let parsed: Envelope<TranslationsData> = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"Bonjour"}]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.data.translations[0].translated_text, "Bonjour");

        let parsed: Envelope<LanguagesData> =
            serde_json::from_str(r#"{"data":{"languages":[{"language":"af"},{"language":"zh-CN"}]}}"#).unwrap();
        assert_eq!(parsed.data.languages.len(), 2);
    }
}
