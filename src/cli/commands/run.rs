//! Implementation of the `fanout run` command.

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::{build_client, require_api_key};
use crate::cli::output::{output, CommandOutput, ProgressObserver, TableFormatter};
use crate::domain::models::{prompts_from_lines, Config, Prompt, TargetMarket};
use crate::infrastructure::export::{export_results, resolve_target, ExportFormat, ExportReport};
use crate::infrastructure::input::load_prompt_csv;
use crate::services::{BatchReport, FanOutService};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV file with a header row; prompts are read from the recognized prompt column
    #[arg(short, long, value_name = "CSV", conflicts_with = "prompts")]
    pub input: Option<PathBuf>,

    /// A prompt to run; repeat for several. Without --input or --prompt, lines are read from stdin
    #[arg(short, long = "prompt", value_name = "TEXT")]
    pub prompts: Vec<String>,

    /// Target market named in every request
    #[arg(short, long, value_enum)]
    pub market: Option<TargetMarket>,

    /// Model to query
    #[arg(long)]
    pub model: Option<String>,

    /// Pause between requests in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Export file (defaults to seo_fanout_<market>.xlsx)
    #[arg(short, long, value_name = "PATH", conflicts_with = "no_export")]
    pub output: Option<PathBuf>,

    /// Export format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Print results without writing a file
    #[arg(long)]
    pub no_export: bool,

    /// Never prompt for the API key
    #[arg(long)]
    pub no_input: bool,
}

/// Prompts plus how they were found.
struct PromptInput {
    prompts: Vec<Prompt>,
    column: Option<String>,
    notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    #[serde(flatten)]
    pub report: BatchReport,
    /// Column prompts were read from, for CSV input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_column: Option<String>,
    /// Set when no CSV header was recognized and the first column was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_notice: Option<String>,
    pub export: Option<ExportReport>,
    /// Why no export file was written, when writing was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_error: Option<String>,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let results = &self.report.results;
        let mut lines = vec![TableFormatter::new().format_results(results.rows())];

        lines.push(format!(
            "\nProcessed {} prompt(s) for {} with {}: {} search queries, {} failed",
            results.len(),
            self.report.market,
            self.report.model,
            results.query_count(),
            results.failed_count()
        ));

        if let Some(export) = &self.export {
            if let Some(reason) = &export.fallback_reason {
                lines.push(format!(
                    "XLSX export failed ({reason}); wrote CSV to {} instead",
                    export.path.display()
                ));
            } else {
                lines.push(format!(
                    "Exported {} row(s) to {}",
                    export.rows,
                    export.path.display()
                ));
            }
        }
        if let Some(error) = &self.export_error {
            lines.push(format!("Export failed: {error}"));
        }

        lines.join("\n")
    }
}

/// Results of a run plus the failure to report once they are shown.
#[derive(Debug)]
pub struct RunOutcome {
    /// What gets printed
    pub output: RunOutput,
    /// Reported after printing; makes the command exit non-zero
    pub failure: Option<anyhow::Error>,
}

impl RunOutcome {
    /// `Err` when the batch aborted or the export could not be written.
    pub fn into_result(self) -> Result<()> {
        self.failure.map_or(Ok(()), Err)
    }
}

pub async fn execute(args: RunArgs, config: &Config, json_mode: bool) -> Result<()> {
    let outcome = run_prompts(&args, config, json_mode).await?;
    output(&outcome.output, json_mode);
    outcome.into_result()
}

/// Read prompts, process them and export the results.
///
/// Errors before the first request are returned directly. Later failures
/// (a batch abort or a failed export) are carried in [`RunOutcome::failure`]
/// so the gathered results can still be shown.
pub async fn run_prompts(args: &RunArgs, config: &Config, json_mode: bool) -> Result<RunOutcome> {
    let market = args.market.unwrap_or(config.target_market);
    let model = args.model.clone().unwrap_or_else(|| config.model.clone());
    let delay = args
        .delay_ms
        .map_or_else(|| config.request_delay(), Duration::from_millis);

    let input = read_prompts(args)?;
    if let Some(notice) = &input.notice {
        eprintln!("{} {notice}", style("!").yellow().bold());
    }
    if input.prompts.is_empty() {
        bail!("No prompts to process");
    }

    let key = require_api_key(config, args.no_input)?;
    let client = build_client(config, key)?;
    let service = FanOutService::new(client, model).with_delay(delay);

    let mut observer = if json_mode || !std::io::stderr().is_terminal() {
        ProgressObserver::hidden()
    } else {
        ProgressObserver::new(input.prompts.len())
    };
    let report = service
        .process_batch(&input.prompts, market, &mut observer)
        .await;
    observer.finish(!report.completed());

    let target =
        (!args.no_export).then(|| resolve_target(args.output.clone(), args.format, market));
    Ok(conclude(report, input, target))
}

/// Export the results to `target` and assemble the outcome.
fn conclude(
    report: BatchReport,
    input: PromptInput,
    target: Option<(PathBuf, ExportFormat)>,
) -> RunOutcome {
    let mut export = None;
    let mut export_failure = None;

    if let Some((path, format)) = target.filter(|_| !report.results.is_empty()) {
        match export_results(&report.results, &path, format) {
            Ok(exported) => {
                info!(
                    path = %exported.path.display(),
                    fallback = exported.used_fallback(),
                    "export written"
                );
                export = Some(exported);
            }
            Err(e) => {
                let err = anyhow::Error::new(e)
                    .context(format!("Failed to export results to {}", path.display()));
                warn!(error = %format!("{err:#}"), "export failed");
                export_failure = Some(err);
            }
        }
    }

    let aborted = report.aborted.clone();
    let output = RunOutput {
        report,
        input_column: input.column,
        input_notice: input.notice,
        export,
        export_error: export_failure.as_ref().map(|e| format!("{e:#}")),
    };
    let failure = aborted.map(|message| anyhow!(message)).or(export_failure);

    RunOutcome { output, failure }
}

fn read_prompts(args: &RunArgs) -> Result<PromptInput> {
    if let Some(path) = &args.input {
        let file = load_prompt_csv(path)
            .with_context(|| format!("Failed to read prompts from {}", path.display()))?;
        if file.skipped > 0 {
            info!(skipped = file.skipped, "blank prompt cells skipped");
        }
        return Ok(PromptInput {
            notice: file.fallback_notice(),
            column: Some(file.column.name().to_string()),
            prompts: file.prompts,
        });
    }

    if !args.prompts.is_empty() {
        return Ok(PromptInput {
            prompts: args
                .prompts
                .iter()
                .filter_map(|text| Prompt::new(text.trim()))
                .collect(),
            column: None,
            notice: None,
        });
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No prompts given. Use --input <CSV>, --prompt <TEXT>, or pipe prompts on stdin");
    }

    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("Failed to read prompts from stdin")?;
    Ok(PromptInput {
        prompts: prompts_from_lines(&text),
        column: None,
        notice: None,
    })
}
