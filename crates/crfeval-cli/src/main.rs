//! crfeval CLI - Command-line interface
//!
//! Usage:
//!   crfeval evaluate <file> [--labels I-NP,B-NP] [--format json] [--export]
//!   crfeval labels

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crfeval_core::config::{parse_label_list, unescape_delimiter};
use crfeval_core::{EvalConfig, LoggingConfig};
use crfeval_metrics::{Evaluator, PredictionSplit};

#[derive(Parser)]
#[command(name = "crfeval")]
#[command(about = "Confusion matrix and precision/recall/F1 for CRF++ test output")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a CRF++ result file
    Evaluate {
        /// Result file: word, POS tag, gold label, predicted label per line
        file: PathBuf,

        /// Comma-separated label universe, in report order
        #[arg(long)]
        labels: Option<String>,

        /// Column delimiter
        #[arg(long)]
        delimiter: Option<String>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write correct and wrong predictions to separate files
        #[arg(long)]
        export: bool,

        /// Destination for correct predictions
        #[arg(long, requires = "export")]
        correct_file: Option<PathBuf>,

        /// Destination for wrong predictions
        #[arg(long, requires = "export")]
        wrong_file: Option<PathBuf>,
    },
    /// Print the configured label universe
    Labels,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EvalConfig::from_file(path)?.with_env_override()?,
        None => EvalConfig::from_env()?,
    };
    init_tracing(&config.logging);

    match cli.command {
        Commands::Evaluate {
            file,
            labels,
            delimiter,
            format,
            export,
            correct_file,
            wrong_file,
        } => {
            apply_overrides(
                &mut config,
                Overrides {
                    labels,
                    delimiter,
                    correct_file,
                    wrong_file,
                },
            )?;
            evaluate(&config, &file, format, export)?;
        }
        Commands::Labels => {
            let universe = config.label_universe()?;
            for (id, label) in universe.iter() {
                println!("{}\t{}", id.index(), label);
            }
        }
    }

    Ok(())
}

/// Command-line values that take precedence over the config file
#[derive(Default)]
struct Overrides {
    labels: Option<String>,
    delimiter: Option<String>,
    correct_file: Option<PathBuf>,
    wrong_file: Option<PathBuf>,
}

fn apply_overrides(config: &mut EvalConfig, overrides: Overrides) -> anyhow::Result<()> {
    if let Some(labels) = overrides.labels {
        config.labels = parse_label_list(&labels);
    }
    if let Some(delimiter) = overrides.delimiter {
        config.input.delimiter = unescape_delimiter(&delimiter);
    }
    if let Some(path) = overrides.correct_file {
        config.output.correct_file = path;
    }
    if let Some(path) = overrides.wrong_file {
        config.output.wrong_file = path;
    }
    config.validate()?;
    Ok(())
}

fn evaluate(config: &EvalConfig, file: &Path, format: OutputFormat, export: bool) -> anyhow::Result<()> {
    let mut evaluator = Evaluator::from_config(config)?.with_record_retention(export);
    evaluator
        .load_from_path(file)
        .with_context(|| format!("failed to evaluate {}", file.display()))?;

    let report = evaluator.report();
    match format {
        OutputFormat::Text => print!("{}", report.to_text(config.output.precision)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if export {
        let split = export_predictions(&evaluator, &config.output.correct_file, &config.output.wrong_file)?;
        tracing::info!(
            correct = split.correct,
            incorrect = split.incorrect,
            "wrote prediction analysis to {} and {}",
            config.output.correct_file.display(),
            config.output.wrong_file.display()
        );
    }

    Ok(())
}

fn export_predictions(
    evaluator: &Evaluator,
    correct_path: &Path,
    wrong_path: &Path,
) -> anyhow::Result<PredictionSplit> {
    let create = |path: &Path| {
        File::create(path)
            .map(BufWriter::new)
            .with_context(|| format!("failed to create {}", path.display()))
    };

    let mut correct = create(correct_path)?;
    let mut wrong = create(wrong_path)?;

    evaluator
        .export_prediction_split(&mut correct, &mut wrong)
        .context("failed to write prediction analysis")
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}
