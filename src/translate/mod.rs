// Translation capabilities
//
// Every backend implements the same small contract and is picked by name:
// - Papago: Naver Papago NMT
// - Kakao: Kakao i translation
// - Google: Google Cloud Translation (v2 REST)
// - Ollama: local LLM with a JSON prompt

pub mod common;
pub mod papago;
pub mod kakao;
pub mod google;
pub mod ollama;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{MsglocError, Result};
use crate::markup::is_passthrough;

/// Plain-text translation between two locales
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationCapability: Send + Sync {
    /// Backend name used in logs and errors
    fn name(&self) -> &'static str;

    /// Whether this backend can translate from `src_locale` to `dst_locale`
    async fn is_supported(&self, src_locale: &str, dst_locale: &str) -> Result<bool>;

    /// Translate plain text; no retries are attempted
    async fn translate(&self, text: &str, src_locale: &str, dst_locale: &str) -> Result<String>;
}

/// Translate one segment of a message.
///
/// Empty and whitespace-only segments come back unchanged without reaching the backend.
/// Backend errors are returned as they are.
pub async fn translate_segment(
    capability: &dyn TranslationCapability,
    segment: &str,
    src_locale: &str,
    dst_locale: &str,
) -> Result<String> {
    common::check_distinct_locales(src_locale, dst_locale)?;
    if is_passthrough(segment) {
        return Ok(segment.to_string());
    }
    capability.translate(segment, src_locale, dst_locale).await
}

type Constructor = fn(&Config) -> Result<Box<dyn TranslationCapability>>;

fn papago_backend(config: &Config) -> Result<Box<dyn TranslationCapability>> {
    let translator = papago::PapagoTranslator::new(config.papago.clone(), config.translate.timeout_secs)?;
    Ok(Box::new(translator))
}

fn kakao_backend(config: &Config) -> Result<Box<dyn TranslationCapability>> {
    let translator = kakao::KakaoTranslator::new(config.kakao.clone(), config.translate.timeout_secs)?;
    Ok(Box::new(translator))
}

fn google_backend(config: &Config) -> Result<Box<dyn TranslationCapability>> {
    let translator = google::GoogleTranslator::new(config.google.clone(), config.translate.timeout_secs)?;
    Ok(Box::new(translator))
}

fn ollama_backend(config: &Config) -> Result<Box<dyn TranslationCapability>> {
    let translator = ollama::OllamaTranslator::new(config.ollama.clone(), config.translate.timeout_secs)?;
    Ok(Box::new(translator))
}

/// Backend name to constructor table
const BACKENDS: &[(&str, Constructor)] = &[
    ("papago", papago_backend as Constructor),
    ("kakao", kakao_backend as Constructor),
    ("google", google_backend as Constructor),
    ("ollama", ollama_backend as Constructor),
];

/// Factory for creating translation capabilities
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Names of every known backend
    pub fn backend_names() -> Vec<&'static str> {
        BACKENDS.iter().map(|(name, _)| *name).collect()
    }

    /// Create the named backend; missing credentials fail here, before any request
    pub fn create(name: &str, config: &Config) -> Result<Box<dyn TranslationCapability>> {
        let wanted = name.trim().to_lowercase();
        let (_, constructor) = BACKENDS
            .iter()
            .find(|(backend, _)| *backend == wanted)
            .ok_or_else(|| {
                MsglocError::Config(format!(
                    "Invalid translation backend '{}'. Valid backends: {}",
                    name,
                    Self::backend_names().join(", ")
                ))
            })?;
        constructor(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_segment_never_reaches_backend() {
        let mut mock = MockTranslationCapability::new();
        mock.expect_translate().never();

        for segment in ["", " ", "\n\t  "] {
            let result = tokio_test::block_on(translate_segment(&mock, segment, "en", "ko")).unwrap();
            assert_eq!(result, segment);
        }
    }

    #[test]
    fn test_segment_is_sent_verbatim() {
        let mut mock = MockTranslationCapability::new();
        mock.expect_translate()
            .withf(|text, src, dst| {
                text.to_string() == " Hello " && src.to_string() == "en" && dst.to_string() == "ko"
            })
            .times(1)
            .returning(|_, _, _| Ok(" 안녕 ".to_string()));

        let result = tokio_test::block_on(translate_segment(&mock, " Hello ", "en", "ko")).unwrap();
        assert_eq!(result, " 안녕 ");
    }

    #[test]
    fn test_identical_locales_fail_before_backend() {
        let mut mock = MockTranslationCapability::new();
        mock.expect_translate().never();

        let err = tokio_test::block_on(translate_segment(&mock, "Hello", "en", "en")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_backend_errors_propagate_unchanged() {
        let mut mock = MockTranslationCapability::new();
        mock.expect_translate()
            .times(1)
            .returning(|text, _, _| Err(MsglocError::PayloadTooLarge { len: text.len(), limit: 1 }));

        let err = tokio_test::block_on(translate_segment(&mock, "Hello", "en", "fr")).unwrap_err();
        assert!(matches!(err, MsglocError::PayloadTooLarge { len: 5, limit: 1 }));
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let err = TranslatorFactory::create("deepl", &Config::default()).err().unwrap();
        assert!(matches!(err, MsglocError::Config(ref msg) if msg.contains("papago, kakao, google, ollama")));
    }

    #[test]
    fn test_factory_requires_credentials() {
        let err = TranslatorFactory::create("Papago", &Config::default()).err().unwrap();
        assert!(matches!(err, MsglocError::MissingCredentials { ref backend, .. } if backend == "papago"));

        let mut config = Config::default();
        config.kakao.api_key = "key".to_string();
        let kakao = TranslatorFactory::create("kakao", &config).unwrap();
        assert_eq!(kakao.name(), "kakao");

        let ollama = TranslatorFactory::create("ollama", &Config::default()).unwrap();
        assert_eq!(ollama.name(), "ollama");
    }
}
