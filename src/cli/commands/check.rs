//! Implementation of the `fanout check` command.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::resolve_credentials;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, TargetMarket};
use crate::infrastructure::credentials::CredentialResolution;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Never prompt for the API key
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub ready: bool,
    pub source: Option<&'static str>,
    pub key: Option<String>,
    pub problem: Option<String>,
    pub model: String,
    pub target_market: TargetMarket,
    pub secrets_path: PathBuf,
}

impl CheckOutput {
    fn new(resolution: &CredentialResolution, config: &Config) -> Self {
        let (source, key) = match resolution {
            CredentialResolution::Found { key, source } => (Some(*source), Some(key.redacted())),
            CredentialResolution::Missing { .. } => (None, None),
        };
        Self {
            ready: resolution.ready_key().is_some(),
            source,
            key,
            problem: resolution.problem(),
            model: config.model.clone(),
            target_market: config.target_market,
            secrets_path: config.secrets_path.clone(),
        }
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match (&self.source, &self.key) {
            (Some(source), Some(key)) => lines.push(format!("API key: {key} (from {source})")),
            _ => lines.push("API key: not found".to_string()),
        }
        if let Some(problem) = &self.problem {
            lines.push(problem.clone());
        }
        lines.push(format!("Model: {}", self.model));
        lines.push(format!("Target market: {}", self.target_market));
        lines.push(format!("Secrets file: {}", self.secrets_path.display()));
        lines.push(if self.ready {
            "Ready to run.".to_string()
        } else {
            "Not ready: runs are disabled until a valid key is configured.".to_string()
        });
        lines.join("\n")
    }
}

pub async fn execute(args: CheckArgs, config: &Config, json_mode: bool) -> Result<()> {
    let resolution = resolve_credentials(config, args.no_input);
    let output_data = CheckOutput::new(&resolution, config);
    output(&output_data, json_mode);

    if !output_data.ready {
        bail!("No usable API key");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ApiKey;

    #[test]
    fn test_check_output_found() {
        let resolution = CredentialResolution::Found {
            key: ApiKey::new("AIzaSyCheckCommandKey").unwrap(),
            source: "environment variable GEMINI_API_KEY",
        };
        let out = CheckOutput::new(&resolution, &Config::default());

        assert!(out.ready);
        assert_eq!(out.key.as_deref(), Some("AIza...[REDACTED]"));
        let human = out.to_human();
        assert!(human.contains("Ready to run."));
        assert!(!human.contains("AIzaSyCheckCommandKey"));
    }

    #[test]
    fn test_check_output_short_key() {
        let resolution = CredentialResolution::Found {
            key: ApiKey::new("tooshort").unwrap(),
            source: "secrets file",
        };
        let out = CheckOutput::new(&resolution, &Config::default());

        assert!(!out.ready);
        assert!(out.problem.unwrap().contains("too short"));
    }

    #[test]
    fn test_check_output_missing() {
        let resolution = CredentialResolution::Missing {
            consulted: vec!["secrets file", "environment variable GEMINI_API_KEY"],
            failures: vec![],
        };
        let out = CheckOutput::new(&resolution, &Config::default());

        assert!(!out.ready);
        assert!(out.to_human().contains("API key: not found"));
    }
}
