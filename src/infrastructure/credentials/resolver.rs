use std::path::Path;
use tracing::{debug, info, warn};

use super::sources::{EnvVarSource, InteractiveSource, SecretsFileSource};
use crate::domain::ports::{ApiKey, CredentialSource};

/// The one environment variable consulted for the API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Outcome of a credential lookup.
#[derive(Debug)]
pub enum CredentialResolution {
    /// A non-blank key was found.
    Found {
        /// The trimmed key
        key: ApiKey,
        /// Name of the source that supplied it
        source: &'static str,
    },
    /// No source supplied a key.
    Missing {
        /// Sources consulted, in order
        consulted: Vec<&'static str>,
        /// Sources that failed while being consulted
        failures: Vec<String>,
    },
}

impl CredentialResolution {
    /// The key, if one was found and passes the readiness check.
    pub fn ready_key(&self) -> Option<&ApiKey> {
        match self {
            Self::Found { key, .. } if key.is_ready() => Some(key),
            _ => None,
        }
    }

    /// Human-readable explanation of why no ready key is available.
    pub fn problem(&self) -> Option<String> {
        match self {
            Self::Found { key, .. } if key.is_ready() => None,
            Self::Found { source, .. } => Some(format!(
                "API key from {source} is too short to be valid. Check {API_KEY_ENV_VAR}."
            )),
            Self::Missing {
                consulted,
                failures,
            } => {
                let mut message = format!(
                    "API key not found (checked: {}). Set {API_KEY_ENV_VAR} in the environment or .env, \
                     or add it to the secrets file.",
                    consulted.join(", ")
                );
                for failure in failures {
                    message.push_str("\n  ");
                    message.push_str(failure);
                }
                Some(message)
            }
        }
    }
}

/// Resolves the API key from an ordered list of sources.
///
/// Called once at startup; the resulting key is passed explicitly to the
/// client. Nothing downstream reads credentials on its own.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// Resolver over `sources`, highest priority first.
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Secrets file, then `GEMINI_API_KEY`, then a terminal prompt.
    pub fn standard(secrets_path: &Path, interactive: bool) -> Self {
        Self::new(vec![
            Box::new(SecretsFileSource::new(secrets_path)),
            Box::new(EnvVarSource::new(API_KEY_ENV_VAR)),
            Box::new(InteractiveSource::new(interactive)),
        ])
    }

    /// Return the first non-blank candidate, trimmed.
    ///
    /// A source that fails is logged and skipped; lookup continues with the
    /// next one.
    pub fn resolve(&self) -> CredentialResolution {
        let mut consulted = Vec::with_capacity(self.sources.len());
        let mut failures = Vec::new();

        for source in &self.sources {
            consulted.push(source.name());
            match source.fetch() {
                Ok(Some(raw)) => {
                    if let Some(key) = ApiKey::new(&raw) {
                        info!(source = source.name(), key = %key, "API key resolved");
                        return CredentialResolution::Found {
                            key,
                            source: source.name(),
                        };
                    }
                    debug!(source = source.name(), "blank API key ignored");
                }
                Ok(None) => debug!(source = source.name(), "no API key"),
                Err(err) => {
                    warn!(source = source.name(), error = %err, "credential source failed");
                    failures.push(format!("{}: {err}", source.name()));
                }
            }
        }

        CredentialResolution::Missing {
            consulted,
            failures,
        }
    }
}
