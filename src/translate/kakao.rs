use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::KakaoConfig;
use crate::error::{MsglocError, Result};
use super::TranslationCapability;
use super::common::{build_client, check_distinct_locales, check_payload, primary_language, read_json, require_credential, send};

const BACKEND: &str = "kakao";
const CHAR_LIMIT: usize = 5000;

/// Kakao's own language codes
const SUPPORTED_LANGS: &[&str] = &[
    "kr", "en", "jp", "cn", "vi", "id", "ar", "bn", "de", "es",
    "fr", "hi", "it", "ms", "nl", "pt", "ru", "th", "tr",
];

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    translated_text: Vec<Vec<String>>,
}

/// Kakao i machine translation
pub struct KakaoTranslator {
    client: Client,
    config: KakaoConfig,
    authorization: String,
}

impl KakaoTranslator {
    pub fn new(config: KakaoConfig, timeout_secs: u64) -> Result<Self> {
        require_credential(BACKEND, "api_key (KAKAO_REST_API_KEY)", &config.api_key)?;
        let authorization = format!("KakaoAK {}", config.api_key);
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
            authorization,
        })
    }

    /// Map an ISO locale to the code Kakao expects
    fn kakao_code(locale: &str) -> String {
        match primary_language(locale).as_str() {
            "ko" => "kr".to_string(),
            "ja" => "jp".to_string(),
            "zh" => "cn".to_string(),
            other => other.to_string(),
        }
    }

    fn code_supported(code: &str) -> bool {
        SUPPORTED_LANGS.contains(&code)
    }
}

#[async_trait]
impl TranslationCapability for KakaoTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn is_supported(&self, src_locale: &str, dst_locale: &str) -> Result<bool> {
        Ok(Self::code_supported(&Self::kakao_code(src_locale))
            && Self::code_supported(&Self::kakao_code(dst_locale)))
    }

    async fn translate(&self, text: &str, src_locale: &str, dst_locale: &str) -> Result<String> {
        check_payload(text, CHAR_LIMIT)?;
        check_distinct_locales(src_locale, dst_locale)?;

        let src_lang = Self::kakao_code(src_locale);
        let target_lang = Self::kakao_code(dst_locale);
        if !Self::code_supported(&src_lang) || !Self::code_supported(&target_lang) {
            return Err(MsglocError::UnsupportedLocalePair {
                backend: BACKEND.to_string(),
                src: src_locale.to_string(),
                dst: dst_locale.to_string(),
            });
        }

        debug!("Kakao {} -> {}: {}", src_lang, target_lang, text);

        let request = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", &self.authorization)
            .form(&[
                ("query", text),
                ("src_lang", src_lang.as_str()),
                ("target_lang", target_lang.as_str()),
            ]);

        let response: KakaoResponse = read_json(BACKEND, send(BACKEND, request).await?).await?;
        Ok(join_paragraphs(response.translated_text))
    }
}

/// Kakao answers with one list of sentences per input paragraph
fn join_paragraphs(paragraphs: Vec<Vec<String>>) -> String {
    paragraphs
        .into_iter()
        .map(|sentences| sentences.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
