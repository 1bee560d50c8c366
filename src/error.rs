use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsglocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials for {backend}: {detail}")]
    MissingCredentials { backend: String, detail: String },

    #[error("Locale pair {src} -> {dst} is not supported by {backend}")]
    UnsupportedLocalePair {
        backend: String,
        src: String,
        dst: String,
    },

    #[error("Payload too large: {len} characters exceeds the {limit} character limit")]
    PayloadTooLarge { len: usize, limit: usize },

    #[error("Upstream translation error: {0}")]
    Upstream(String),
}

impl MsglocError {
    /// True for errors raised before any translation request was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCredentials { .. })
    }
}

pub type Result<T> = std::result::Result<T, MsglocError>;
