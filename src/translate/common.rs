use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::same_locale;
use crate::error::{MsglocError, Result};

/// HTTP client shared by one backend instance
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("msgloc/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fail with `MissingCredentials` when a configured secret is empty
pub fn require_credential(backend: &str, name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MsglocError::MissingCredentials {
            backend: backend.to_string(),
            detail: format!("{} is not set", name),
        });
    }
    Ok(())
}

/// Fail with `PayloadTooLarge` when the text exceeds a per-request character limit
pub fn check_payload(text: &str, limit: usize) -> Result<()> {
    let len = text.chars().count();
    if len > limit {
        return Err(MsglocError::PayloadTooLarge { len, limit });
    }
    Ok(())
}

pub fn check_distinct_locales(src_locale: &str, dst_locale: &str) -> Result<()> {
    if same_locale(src_locale, dst_locale) {
        return Err(MsglocError::Config(format!(
            "Source and destination locale must differ (both are '{}')",
            src_locale
        )));
    }
    Ok(())
}

/// Primary language subtag, lowercased: `en_US` -> `en`
pub fn primary_language(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Language code as most translation APIs expect it.
///
/// Chinese keeps its script region (`zh_CN` -> `zh-CN`); everything else is reduced
/// to the primary language.
pub fn api_language_code(locale: &str) -> String {
    let primary = primary_language(locale);
    if primary == "zh" {
        let region = locale
            .split(['-', '_'])
            .nth(1)
            .map(|r| r.to_uppercase())
            .unwrap_or_else(|| "CN".to_string());
        return format!("zh-{}", region);
    }
    primary
}

/// Send a prepared request, mapping transport failures to upstream errors
pub async fn send(backend: &str, request: reqwest::RequestBuilder) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| MsglocError::Upstream(format!("{} request failed: {}", backend, e)))
}

/// Read a JSON body, turning non-success statuses into upstream errors
pub async fn read_json<T: DeserializeOwned>(backend: &str, response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| MsglocError::Upstream(format!("{} response could not be read: {}", backend, e)))?;

    debug!("{} responded {}: {}", backend, status, body);

    if !status.is_success() {
        return Err(MsglocError::Upstream(format!(
            "{} API error {}: {}",
            backend,
            status,
            body.trim()
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| MsglocError::Upstream(format!("{} returned an unexpected response: {}", backend, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(primary_language("en_US"), "en");
        assert_eq!(primary_language("pt-BR"), "pt");
        assert_eq!(primary_language("KO"), "ko");
        assert_eq!(api_language_code("zh_TW"), "zh-TW");
        assert_eq!(api_language_code("zh"), "zh-CN");
        assert_eq!(api_language_code("ja"), "ja");
    }

    #[test]
    fn test_payload_limit_counts_characters() {
        assert!(check_payload(&"가".repeat(5000), 5000).is_ok());
        let err = check_payload(&"a".repeat(5001), 5000).unwrap_err();
        assert!(matches!(err, MsglocError::PayloadTooLarge { len: 5001, limit: 5000 }));
    }

    #[test]
    fn test_missing_credential() {
        assert!(require_credential("papago", "client_id", "abc").is_ok());
        let err = require_credential("papago", "client_id", "  ").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_identical_locales_rejected() {
        assert!(check_distinct_locales("en", "fr").is_ok());
        assert!(matches!(check_distinct_locales("en", "EN"), Err(MsglocError::Config(_))));
    }
}
