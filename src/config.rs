use log::warn;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::i18n::Language;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

/// Settings read once at startup and handed to whoever needs them.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub bind_addr: String,
    pub port: u16,
    pub session_idle: Duration,
    pub default_language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            default_language: Language::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        let default_language = match lookup("DEFAULT_LANGUAGE") {
            Some(tag) => Language::from_tag(&tag).unwrap_or_else(|| {
                warn!("Unknown DEFAULT_LANGUAGE {:?}, using {}", tag, defaults.default_language.tag());
                defaults.default_language
            }),
            None => defaults.default_language,
        };

        Self {
            api_key: lookup("OPENAI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            api_base: text("OPENAI_API_BASE", defaults.api_base),
            model: text("OPENAI_MODEL", defaults.model),
            temperature: parsed(&lookup, "TEMPERATURE", defaults.temperature),
            max_tokens: parsed(&lookup, "MAX_TOKENS", defaults.max_tokens),
            bind_addr: text("BIND_ADDR", defaults.bind_addr),
            port: parsed(&lookup, "PORT", defaults.port),
            session_idle: Duration::from_secs(parsed(
                &lookup,
                "SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )),
            default_language,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("session_idle", &self.session_idle)
            .field("default_language", &self.default_language)
            .finish()
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
