use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, MsglocError};

// Default values shared by the HTTP backends
fn default_timeout_secs() -> u64 {
    60
}

fn default_backend() -> String {
    "papago".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translate: TranslateConfig,
    pub papago: PapagoConfig,
    pub kakao: KakaoConfig,
    pub google: GoogleConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation backend name (papago, kakao, google, ollama)
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Target locales used when none are given on the command line
    #[serde(default)]
    pub targets: Vec<String>,
    /// HTTP timeout for a single translation request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PapagoConfig {
    pub endpoint: String,
    /// Falls back to NAVER_CLIENT_ID
    pub client_id: String,
    /// Falls back to NAVER_CLIENT_SECRET
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KakaoConfig {
    pub endpoint: String,
    /// Falls back to KAKAO_REST_API_KEY
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub endpoint: String,
    /// Falls back to GOOGLE_API_KEY
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate: TranslateConfig::default(),
            papago: PapagoConfig::default(),
            kakao: KakaoConfig::default(),
            google: GoogleConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            targets: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PapagoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openapi.naver.com/v1/papago/n2mt".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://kapi.kakao.com/v1/translation/translate".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MsglocError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| MsglocError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MsglocError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MsglocError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Fill credentials left empty in the file from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        fill(&mut self.papago.client_id, lookup("NAVER_CLIENT_ID"));
        fill(&mut self.papago.client_secret, lookup("NAVER_CLIENT_SECRET"));
        fill(&mut self.kakao.api_key, lookup("KAKAO_REST_API_KEY"));
        fill(&mut self.google.api_key, lookup("GOOGLE_API_KEY"));
    }
}

fn fill(slot: &mut String, value: Option<String>) {
    if slot.is_empty() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *slot = value;
        }
    }
}
