//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{check::CheckArgs, models::ModelsArgs, run::RunArgs};

#[derive(Parser, Debug)]
#[command(name = "fanout")]
#[command(
    about = "Capture the web searches a grounded Gemini model issues for each prompt",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file to use instead of .fanout/config.yaml and .fanout/local.yaml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run prompts through the model and collect the search queries it issued
    Run(RunArgs),

    /// List models available to the configured API key
    Models(ModelsArgs),

    /// Report where the API key comes from and whether it looks usable
    Check(CheckArgs),
}
