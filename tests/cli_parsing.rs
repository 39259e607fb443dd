use clap::Parser;
use fanout::cli::{Cli, Commands};
use fanout::domain::models::TargetMarket;
use fanout::infrastructure::export::ExportFormat;
use std::path::PathBuf;

#[test]
fn test_parse_run_with_csv_input() {
    let cli = Cli::try_parse_from([
        "fanout",
        "run",
        "--input",
        "prompts.csv",
        "--market",
        "sweden",
        "--delay-ms",
        "500",
        "--output",
        "out.xlsx",
    ])
    .unwrap();

    assert!(!cli.json);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.input, Some(PathBuf::from("prompts.csv")));
            assert_eq!(args.market, Some(TargetMarket::Sweden));
            assert_eq!(args.delay_ms, Some(500));
            assert_eq!(args.output, Some(PathBuf::from("out.xlsx")));
            assert!(args.prompts.is_empty());
            assert!(!args.no_export);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_run_with_repeated_prompts() {
    let cli = Cli::try_parse_from([
        "fanout",
        "--json",
        "run",
        "-p",
        "best ETFs",
        "--prompt",
        "cheap flights",
        "--format",
        "csv",
        "--no-input",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.prompts, vec!["best ETFs", "cheap flights"]);
            assert_eq!(args.format, Some(ExportFormat::Csv));
            assert!(args.no_input);
            assert_eq!(args.market, None);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_input_conflicts_with_prompt() {
    let result = Cli::try_parse_from(["fanout", "run", "--input", "a.csv", "--prompt", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_output_conflicts_with_no_export() {
    let result =
        Cli::try_parse_from(["fanout", "run", "-p", "x", "--output", "a.xlsx", "--no-export"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_market_is_rejected() {
    let result = Cli::try_parse_from(["fanout", "run", "-p", "x", "--market", "germany"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_models_and_check() {
    let cli = Cli::try_parse_from(["fanout", "models", "--all", "--config", "alt.yaml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
    assert!(matches!(cli.command, Commands::Models(ref args) if args.all));

    let cli = Cli::try_parse_from(["fanout", "check", "--no-input"]).unwrap();
    assert!(matches!(cli.command, Commands::Check(ref args) if args.no_input));
}
