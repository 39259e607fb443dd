//! CLI command implementations.

pub mod check;
pub mod models;
pub mod run;

use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::ApiKey;
use crate::infrastructure::credentials::{CredentialResolution, CredentialResolver};
use crate::infrastructure::gemini::{GeminiClient, GeminiClientConfig};
use crate::services::CRITICAL_ERROR_PREFIX;

/// Look up the API key from the configured secrets file, the environment
/// and, unless `no_input`, the terminal.
pub(crate) fn resolve_credentials(config: &Config, no_input: bool) -> CredentialResolution {
    CredentialResolver::standard(&config.secrets_path, !no_input).resolve()
}

/// A ready API key, or the reason the command cannot run.
pub(crate) fn require_api_key(config: &Config, no_input: bool) -> Result<ApiKey> {
    let resolution = resolve_credentials(config, no_input);
    match resolution.ready_key() {
        Some(key) => Ok(key.clone()),
        None => Err(anyhow!(
            "Action disabled: {}",
            resolution
                .problem()
                .unwrap_or_else(|| "no usable API key".to_string())
        )),
    }
}

/// Build the Gemini client for `key`. Failure here is a batch-level error.
pub(crate) fn build_client(config: &Config, key: ApiKey) -> Result<Arc<GeminiClient>> {
    GeminiClient::new(GeminiClientConfig::from_config(config, key))
        .map(Arc::new)
        .map_err(|e| anyhow!("{CRITICAL_ERROR_PREFIX}{e}"))
}
