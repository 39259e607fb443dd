//! Implementation of the `fanout models` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::IsTerminal;

use super::{build_client, require_api_key};
use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{Config, ModelInfo};

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Include models that cannot serve generateContent
    #[arg(short, long)]
    pub all: bool,

    /// Never prompt for the API key
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelsOutput {
    pub models: Vec<ModelInfo>,
    pub total: usize,
}

impl CommandOutput for ModelsOutput {
    fn to_human(&self) -> String {
        if self.models.is_empty() {
            return "No models available for this API key.".to_string();
        }
        format!(
            "{}\n\n{} model(s)",
            TableFormatter::new().format_models(&self.models),
            self.total
        )
    }
}

pub async fn execute(args: ModelsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let key = require_api_key(config, args.no_input)?;
    let client = build_client(config, key)?;

    let spinner = (!json_mode && std::io::stderr().is_terminal())
        .then(|| create_spinner("Listing models..."));
    let listed = client.list_models().await;
    if let Some(spinner) = &spinner {
        match &listed {
            Ok(models) => spinner.finish_success(format!("Found {} model(s)", models.len())),
            Err(_) => spinner.finish_error("Listing models failed"),
        }
    }

    let models: Vec<ModelInfo> = listed
        .context("Failed to list models")?
        .into_iter()
        .filter(|m| args.all || m.supports_generate_content())
        .collect();

    let output_data = ModelsOutput {
        total: models.len(),
        models,
    };
    output(&output_data, json_mode);
    Ok(())
}
