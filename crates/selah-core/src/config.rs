//! Gateway and vendor configuration loaded from file, `.env`, and environment.
//!
//! | Source | Example |
//! |--------|---------|
//! | Defaults | see `SelahConfig::default()` |
//! | TOML file | `SELAH_CONFIG` path, falls back to `config/selah.toml` |
//! | Environment | `SELAH_PORT=9000`, `SELAH_POLL__TIMEOUT_SECS=60` |
//! | Legacy key vars | `EDEN_KEY` or `EDEN_API_TOKEN` when `SELAH_EDEN_API_KEY` is unset |

use crate::error::{VoiceError, VoiceResult};
use crate::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_EDEN_BASE_URL: &str = "https://api.edenai.run/v2";

fn default_app_name() -> String {
    "Selah Voice".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_base_url() -> String {
    DEFAULT_EDEN_BASE_URL.to_string()
}

fn default_source_language() -> String {
    "am".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Polling settings for asynchronous vendor jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    /// Consecutive unparsable status responses tolerated before giving up.
    #[serde(default = "default_max_unparsable")]
    pub max_unparsable: u32,
}

fn default_poll_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_max_unparsable() -> u32 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_poll_timeout_secs(),
            interval_secs: default_poll_interval_secs(),
            max_unparsable: default_max_unparsable(),
        }
    }
}

/// Bounds for the translation cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelahConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    /// Bearer token attached to every vendor call.
    #[serde(default)]
    pub eden_api_key: String,
    #[serde(default = "default_base_url")]
    pub eden_base_url: String,
    /// Declared language of uploaded clips.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub translation_cache: CacheConfig,
}

impl Default for SelahConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            host: default_host(),
            port: default_port(),
            debug: false,
            eden_api_key: String::new(),
            eden_base_url: default_base_url(),
            source_language: default_source_language(),
            request_timeout_secs: default_request_timeout_secs(),
            poll: PollConfig::default(),
            translation_cache: CacheConfig::default(),
        }
    }
}

impl SelahConfig {
    /// Load `.env`, then the optional TOML file, then `SELAH_*` environment overrides.
    pub fn load() -> VoiceResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(target: "selah::config", ".env not loaded: {}", e);
        }
        let config_path =
            std::env::var("SELAH_CONFIG").unwrap_or_else(|_| "config/selah".to_string());
        let mut config = Self::load_from(&config_path)?;
        config.apply_legacy_key();
        config.validate()?;
        Ok(config)
    }

    /// Fill an empty API key from `EDEN_KEY`, then `EDEN_API_TOKEN`.
    pub fn apply_legacy_key(&mut self) {
        if !self.eden_api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = env_opt_string("EDEN_KEY").or_else(|| env_opt_string("EDEN_API_TOKEN")) {
            tracing::debug!(target: "selah::config", "Using legacy vendor key variable");
            self.eden_api_key = key;
        }
    }

    /// Build from a config file path (with or without extension) plus environment.
    pub fn load_from(config_path: &str) -> VoiceResult<Self> {
        let path = Path::new(config_path);
        let builder = config::Config::builder();
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder.add_source(config::File::with_name(config_path).required(false))
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("SELAH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(built.try_deserialize()?)
    }

    pub fn validate(&self) -> VoiceResult<()> {
        if self.eden_api_key.trim().is_empty() {
            return Err(VoiceError::Config(
                "Vendor API key must be set (SELAH_EDEN_API_KEY, EDEN_KEY or EDEN_API_TOKEN)"
                    .to_string(),
            ));
        }
        if self.port == 0 {
            return Err(VoiceError::Config("port must be between 1 and 65535".to_string()));
        }
        if self.poll.interval_secs == 0 {
            return Err(VoiceError::Config("poll.interval_secs must be positive".to_string()));
        }
        if self.translation_cache.capacity == 0 {
            return Err(VoiceError::Config(
                "translation_cache.capacity must be positive".to_string(),
            ));
        }
        self.source_language()
            .map_err(|e| VoiceError::Config(format!("source_language: {}", e)))?;
        Ok(())
    }

    pub fn source_language(&self) -> VoiceResult<LanguageCode> {
        self.source_language.trim().parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
