use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PapagoConfig;
use crate::error::{MsglocError, Result};
use super::TranslationCapability;
use super::common::{api_language_code, build_client, check_distinct_locales, check_payload, read_json, require_credential, send};

const BACKEND: &str = "papago";
const CHAR_LIMIT: usize = 5000;

/// Language pairs Papago NMT translates, in either direction
const SUPPORTED_PAIRS: &[(&str, &str)] = &[
    ("ko", "en"), ("ko", "ja"), ("ko", "zh-CN"), ("ko", "zh-TW"),
    ("ko", "es"), ("ko", "fr"), ("ko", "ru"), ("ko", "vi"),
    ("ko", "th"), ("ko", "id"), ("ko", "de"), ("ko", "it"),
    ("zh-CN", "zh-TW"), ("zh-CN", "ja"), ("zh-TW", "ja"),
    ("en", "ja"), ("en", "zh-CN"), ("en", "zh-TW"), ("en", "fr"),
];

#[derive(Debug, Deserialize)]
struct PapagoResponse {
    message: PapagoMessage,
}

#[derive(Debug, Deserialize)]
struct PapagoMessage {
    result: PapagoResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PapagoResult {
    translated_text: String,
}

/// Naver Papago neural machine translation
pub struct PapagoTranslator {
    client: Client,
    config: PapagoConfig,
}

impl PapagoTranslator {
    pub fn new(config: PapagoConfig, timeout_secs: u64) -> Result<Self> {
        require_credential(BACKEND, "client_id (NAVER_CLIENT_ID)", &config.client_id)?;
        require_credential(BACKEND, "client_secret (NAVER_CLIENT_SECRET)", &config.client_secret)?;
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
        })
    }

    fn pair_supported(src: &str, dst: &str) -> bool {
        SUPPORTED_PAIRS
            .iter()
            .any(|&(a, b)| (a == src && b == dst) || (a == dst && b == src))
    }
}

#[async_trait]
impl TranslationCapability for PapagoTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn is_supported(&self, src_locale: &str, dst_locale: &str) -> Result<bool> {
        Ok(Self::pair_supported(
            &api_language_code(src_locale),
            &api_language_code(dst_locale),
        ))
    }

    async fn translate(&self, text: &str, src_locale: &str, dst_locale: &str) -> Result<String> {
        check_payload(text, CHAR_LIMIT)?;
        check_distinct_locales(src_locale, dst_locale)?;

        let source = api_language_code(src_locale);
        let target = api_language_code(dst_locale);
        if !Self::pair_supported(&source, &target) {
            return Err(MsglocError::UnsupportedLocalePair {
                backend: BACKEND.to_string(),
                src: src_locale.to_string(),
                dst: dst_locale.to_string(),
            });
        }

        debug!("Papago {} -> {}: {}", source, target, text);

        let request = self
            .client
            .post(&self.config.endpoint)
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret)
            .form(&[("source", source.as_str()), ("target", target.as_str()), ("text", text)]);

        let response: PapagoResponse = read_json(BACKEND, send(BACKEND, request).await?).await?;
        Ok(response.message.result.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> PapagoTranslator {
        PapagoTranslator::new(
            PapagoConfig {
                endpoint: "http://127.0.0.1:9/unused".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_supported_pairs_are_symmetric() {
        assert!(PapagoTranslator::pair_supported("en", "ko"));
        assert!(PapagoTranslator::pair_supported("ko", "en"));
        assert!(PapagoTranslator::pair_supported("ja", "zh-TW"));
        assert!(!PapagoTranslator::pair_supported("en", "de"));
    }

    #[tokio::test]
    async fn test_is_supported_normalizes_extension_locales() {
        let papago = translator();
        assert!(papago.is_supported("en_US", "zh_CN").await.unwrap());
        assert!(!papago.is_supported("en", "ru").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejections_happen_before_any_request() {
        let papago = translator();

        let err = papago.translate("Hello", "en", "de").await.unwrap_err();
        assert!(matches!(err, MsglocError::UnsupportedLocalePair { .. }));

        let err = papago.translate(&"x".repeat(CHAR_LIMIT + 1), "en", "ko").await.unwrap_err();
        assert!(matches!(err, MsglocError::PayloadTooLarge { .. }));

        let err = papago.translate("Hello", "ko", "ko").await.unwrap_err();
        assert!(matches!(err, MsglocError::Config(_)));
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{"message":{"@type":"response","result":{"srcLangType":"en","tarLangType":"ko","translatedText":"안녕하세요"}}}"#;
        let parsed: PapagoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message.result.translated_text, "안녕하세요");
    }
}
