use actix_web::http::Uri;
use dotenv::dotenv;
use log::debug;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_MODEL_STT: &str = "whisper-1";
pub const DEFAULT_MODEL_TTS: &str = "gpt-4o-mini-tts";
pub const DEFAULT_MODEL_CHAT: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is required")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_model_stt: String,
    pub openai_model_tts: String,
    pub openai_model_chat: String,
    pub frontend_origin: Option<String>,
    pub openai_base_url: String,
    pub host: String,
    pub port: u16,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"<redacted>")
            .field("openai_model_stt", &self.openai_model_stt)
            .field("openai_model_tts", &self.openai_model_tts)
            .field("openai_model_chat", &self.openai_model_chat)
            .field("frontend_origin", &self.frontend_origin)
            .field("openai_base_url", &self.openai_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let frontend_origin = match get("FRONTEND_ORIGIN") {
            Some(raw) => Some(parse_origin(raw)?),
            None => None,
        };

        let settings = Settings {
            openai_api_key,
            openai_model_stt: get("OPENAI_MODEL_STT").unwrap_or_else(|| DEFAULT_MODEL_STT.into()),
            openai_model_tts: get("OPENAI_MODEL_TTS").unwrap_or_else(|| DEFAULT_MODEL_TTS.into()),
            openai_model_chat: get("OPENAI_MODEL_CHAT")
                .unwrap_or_else(|| DEFAULT_MODEL_CHAT.into()),
            frontend_origin,
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
        };

        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

// `*` is kept as-is and means any origin; anything else must be a scheme://host URI
fn parse_origin(raw: String) -> Result<String, ConfigError> {
    let origin = raw.trim().trim_end_matches('/').to_string();
    if origin == "*" {
        return Ok(origin);
    }
    match origin.parse::<Uri>() {
        Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => Ok(origin),
        _ => Err(ConfigError::InvalidValue {
            key: "FRONTEND_ORIGIN",
            value: raw,
        }),
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Returns the process-wide settings, resolving them on first use.
///
/// A failed resolution is not cached, so a later call may still succeed once
/// the environment is fixed. Concurrent first callers may both resolve, but only
/// one value is ever stored and both observe it.
pub fn resolve() -> Result<&'static Settings, ConfigError> {
    if let Some(settings) = SETTINGS.get() {
        return Ok(settings);
    }
    let settings = Settings::from_env()?;
    Ok(SETTINGS.get_or_init(|| settings))
}
