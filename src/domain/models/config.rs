use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::prompt::TargetMarket;

/// Main configuration structure for fanout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Model identifier used for generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Generative Language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Market interpolated into requests when none is given on the command line
    #[serde(default)]
    pub target_market: TargetMarket,

    /// Fixed delay between successive requests, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Secrets file consulted first when resolving the API key
    #[serde(default = "default_secrets_path")]
    pub secrets_path: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Free tier allows 15 requests per minute.
const fn default_request_delay_ms() -> u64 {
    2000
}

const fn default_timeout_secs() -> u64 {
    120
}

fn default_secrets_path() -> PathBuf {
    PathBuf::from(".fanout/secrets.toml")
}

impl Config {
    /// Inter-request delay as a [`Duration`].
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            target_market: TargetMarket::default(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            secrets_path: default_secrets_path(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for a daily-rotated JSON log file (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
