//! `scorecard`: evaluate applicant data against credit scorecards.

mod inputs;
mod report;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scorecard_core::{evaluate, FieldKind, Scorecard};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::inputs::{load_inputs_file, merge_inputs};
use crate::report::{render_evaluation, render_fields, EvaluationReport};

#[derive(Parser, Debug)]
#[command(name = "scorecard")]
#[command(about = "Score loan applicants against rule-based credit scorecards", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate applicant inputs against a scorecard
    Evaluate(EvaluateArgs),
    /// Validate one or more scorecard files
    Validate {
        /// Scorecard files (YAML or JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List a scorecard's fields with their inferred input kinds
    Fields {
        /// Scorecard file (YAML or JSON)
        scorecard: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Scorecard file (YAML or JSON)
    #[arg(short, long)]
    scorecard: PathBuf,

    /// Applicant inputs as a JSON or YAML mapping of field to value
    #[arg(short, long)]
    inputs: Option<PathBuf>,

    /// Set a single input, e.g. --set age=25 (overrides --inputs)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldSummary<'a> {
    field: &'a str,
    description: String,
    kind: FieldKind,
    rules: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Validate { files } => {
            if validate_files(&files) > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Fields { scorecard, format } => run_fields(scorecard, format),
    }
}

fn load_scorecard(path: &Path) -> Result<Scorecard> {
    Scorecard::from_file(path)
        .with_context(|| format!("Failed to load scorecard {}", path.display()))
}

fn run_evaluate(args: EvaluateArgs) -> Result<ExitCode> {
    let scorecard = load_scorecard(&args.scorecard)?;

    let base = match &args.inputs {
        Some(path) => load_inputs_file(path)?,
        None => HashMap::new(),
    };
    let inputs = merge_inputs(base, &args.set)?;

    tracing::debug!(
        scorecard = %scorecard.score_card_id,
        inputs = inputs.len(),
        "Evaluating"
    );

    let result = evaluate(&scorecard, &inputs);

    match args.format {
        OutputFormat::Text => print!("{}", render_evaluation(&scorecard, &result)),
        OutputFormat::Json => {
            let report = EvaluationReport::new(&scorecard, &result);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Print one line per file and return the number that failed.
fn validate_files(files: &[PathBuf]) -> usize {
    let mut failures = 0;

    for path in files {
        match Scorecard::from_file(path) {
            Ok(scorecard) => println!(
                "OK      {} ({} fields, {} rules)",
                path.display(),
                scorecard.fields.len(),
                scorecard.rule_count()
            ),
            Err(e) => {
                failures += 1;
                println!("FAILED  {}: {}", path.display(), e);
            }
        }
    }

    failures
}

fn run_fields(path: PathBuf, format: OutputFormat) -> Result<ExitCode> {
    let scorecard = load_scorecard(&path)?;

    match format {
        OutputFormat::Text => print!("{}", render_fields(&scorecard)),
        OutputFormat::Json => {
            let fields: Vec<FieldSummary> = scorecard
                .fields
                .iter()
                .map(|group| FieldSummary {
                    field: &group.field,
                    description: group.label().into_owned(),
                    kind: group.kind(),
                    rules: group.rules.len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
