//! CLI entry point for the imputation batch.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_imputation::{
    BatchReport, BatchRunner, ImputationConfig, ImputationConfigBuilder, ImputationMethod,
    ReportGenerator,
};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-compatible imputation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMethod {
    /// Global column mean
    Mean,
    /// Column mean over rows of the same class
    ConditionalMean,
    /// Value of the nearest other row
    HotDeck,
    /// Value of the nearest other row of the same class
    ConditionalHotDeck,
}

impl From<CliMethod> for ImputationMethod {
    fn from(cli: CliMethod) -> Self {
        match cli {
            CliMethod::Mean => ImputationMethod::Mean,
            CliMethod::ConditionalMean => ImputationMethod::ConditionalMean,
            CliMethod::HotDeck => ImputationMethod::HotDeck,
            CliMethod::ConditionalHotDeck => ImputationMethod::ConditionalHotDeck,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Missing-value imputation with mean and hot-deck strategies",
    long_about = "Fills the missing cells of one or more incomplete datasets with four \
                  imputation strategies and scores each against a complete reference.\n\n\
                  EXAMPLES:\n  \
                  # Default file names in the working directory\n  \
                  lex-imputation\n\n  \
                  # Explicit inputs\n  \
                  lex-imputation --incomplete 20=data/missing20.csv \
                  --reference data/complete.csv\n\n  \
                  # Only the hot-deck strategies, keep going past failures\n  \
                  lex-imputation --method hot-deck --method conditional-hot-deck --isolate-failures"
)]
struct Args {
    /// Incomplete dataset as NAME=PATH (repeatable)
    ///
    /// NAME labels the output files and score lines.
    #[arg(
        short,
        long = "incomplete",
        value_name = "NAME=PATH",
        value_parser = parse_named_path,
        default_values = [
            "004=assignment2_dataset_missing004.csv",
            "20=assignment2_dataset_missing20.csv",
        ]
    )]
    incomplete: Vec<(String, PathBuf)>,

    /// Complete reference dataset used for scoring
    #[arg(short, long, default_value = "assignment2_dataset_complete.csv")]
    reference: PathBuf,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for completed datasets and reports
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Imputation method to run (repeatable; default: all four)
    #[arg(short, long = "method", value_enum)]
    methods: Vec<CliMethod>,

    /// Token marking a missing cell
    #[arg(long)]
    missing_token: Option<String>,

    /// Maximum decimal places in written values
    #[arg(long)]
    decimal_places: Option<usize>,

    /// Record a failing imputer run and continue instead of aborting
    #[arg(long)]
    isolate_failures: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and scores)
    #[arg(short, long)]
    quiet: bool,

    /// Output the batch report as JSON to stdout instead of score lines
    ///
    /// Disables all logs; only outputs the JSON report.
    #[arg(long)]
    json: bool,

    /// Write the batch report to <output>/<prefix>_report.json
    #[arg(short = 'e', long)]
    emit_report: bool,
}

/// Parse `NAME=PATH`.
fn parse_named_path(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected NAME=PATH, got '{}'", value)),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    let mut builder = BatchRunner::builder()
        .config(config.clone())
        .reference(&args.reference);
    for (name, path) in &args.incomplete {
        builder = builder.incomplete(name, path);
    }
    let runner = builder.build()?;

    info!("{}", "=".repeat(60));
    info!(
        "Imputing {} dataset(s) with {} method(s)",
        args.incomplete.len(),
        config.methods.len()
    );
    info!("{}", "=".repeat(60));

    let report = match runner.run() {
        Ok(report) => report,
        Err(e) => {
            error!("Imputation failed: {}", e);
            return Err(anyhow!("Imputation failed: {}", e));
        }
    };

    handle_output(&report, &config, &args)
}

/// Load the configuration file, if any, and apply command-line overrides.
fn build_config(args: &Args) -> Result<ImputationConfig> {
    let base = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<ImputationConfig>(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ImputationConfig::default(),
    };

    let mut builder = ImputationConfigBuilder::from_config(base);
    if let Some(ref output) = args.output {
        builder = builder.output_dir(output);
    }
    if !args.methods.is_empty() {
        builder = builder.methods(args.methods.iter().copied().map(Into::into).collect());
    }
    if let Some(ref token) = args.missing_token {
        builder = builder.missing_token(token);
    }
    if let Some(places) = args.decimal_places {
        builder = builder.decimal_places(places);
    }
    if args.isolate_failures {
        builder = builder.isolate_failures(true);
    }

    Ok(builder.build()?)
}

/// Handle batch output based on CLI flags.
///
/// Output behavior:
/// - Default: Print one `MAE_<dataset>_<method>` line per run
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
///
/// Returns an error when any run failed, so the exit status is non-zero.
fn handle_output(report: &BatchReport, config: &ImputationConfig, args: &Args) -> Result<()> {
    if args.emit_report {
        let generator =
            ReportGenerator::new(config.output_dir.clone(), config.output_prefix.clone());
        let report_path = generator.write_report_to_file(report)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in report.score_lines() {
            println!("{}", line);
        }
    }

    let failed = report
        .records
        .iter()
        .filter(|record| record.error.is_some())
        .count();
    if failed > 0 {
        return Err(anyhow!("{} of {} imputer runs failed", failed, report.records.len()));
    }
    Ok(())
}
