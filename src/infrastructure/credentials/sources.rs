use console::Term;
use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::env::{self, VarError};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::domain::ports::{CredentialError, CredentialSource};

/// Shape of the secrets file; unrelated keys are ignored.
#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GEMINI_API_KEY", alias = "gemini_api_key")]
    gemini_api_key: Option<String>,
}

/// Managed secrets file, e.g. `.fanout/secrets.toml`:
///
/// ```toml
/// GEMINI_API_KEY = "AIza..."
/// ```
#[derive(Debug, Clone)]
pub struct SecretsFileSource {
    path: PathBuf,
}

impl SecretsFileSource {
    /// Source reading the given TOML file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialSource for SecretsFileSource {
    fn name(&self) -> &'static str {
        "secrets file"
    }

    fn fetch(&self) -> Result<Option<String>, CredentialError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let secrets: SecretsFile = Figment::from(Toml::file(&self.path))
            .extract()
            .map_err(|e| CredentialError::SecretStore {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(secrets.gemini_api_key)
    }
}

/// A single process environment variable.
#[derive(Debug, Clone, Copy)]
pub struct EnvVarSource {
    var: &'static str,
}

impl EnvVarSource {
    /// Source reading `var`.
    pub const fn new(var: &'static str) -> Self {
        Self { var }
    }
}

impl CredentialSource for EnvVarSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn fetch(&self) -> Result<Option<String>, CredentialError> {
        match env::var(self.var) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(CredentialError::InvalidEnvironment(self.var)),
        }
    }
}

/// Hidden prompt on the controlling terminal.
///
/// Yields nothing when disabled or when stdin/stderr are not terminals, so
/// piped and scripted runs never block.
#[derive(Debug, Clone)]
pub struct InteractiveSource {
    enabled: bool,
}

impl InteractiveSource {
    /// Source that prompts only if `enabled`.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl CredentialSource for InteractiveSource {
    fn name(&self) -> &'static str {
        "interactive input"
    }

    fn fetch(&self) -> Result<Option<String>, CredentialError> {
        let term = Term::stderr();
        if !self.enabled || !term.is_term() || !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        term.write_line("No API key found in secrets file or environment.")?;
        term.write_str("Enter Gemini API key: ")?;
        let input = term.read_secure_line()?;
        Ok(Some(input))
    }
}
