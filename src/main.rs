use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use diagfusion::config::{ConfigError, FusionConfig, load_config};
use diagfusion::input::{InputError, load_catalog, load_requests};
use diagfusion::logging::init_tracing;
use diagfusion::model::LabelCatalog;
use diagfusion::model::preset::{IMAGE_MODELS, TEXT_MODELS, builtin_presets};
use diagfusion::pipeline::fuse_batch;
use diagfusion::report::json::ToolMeta;
use diagfusion::report::{ReportInput, write_reports};

#[derive(Debug, Parser)]
#[command(
    name = "diagfusion",
    version,
    about = "Fuse text and image classifier outputs into a ranked diagnosis."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fuse every request in a JSON file and write reports.
    Run(RunArgs),
    /// List the diagnosis labels the classifiers may emit.
    Labels {
        #[arg(long)]
        labels: Option<PathBuf>,
    },
    /// List the built-in model pairings.
    Presets,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Request file (.json or .json.gz), one object or an array.
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Label catalog JSON; the built-in thoracic labels otherwise.
    #[arg(long)]
    labels: Option<PathBuf>,
    #[arg(long)]
    text_weight: Option<f64>,
    #[arg(long)]
    image_weight: Option<f64>,
    #[arg(long)]
    gap_threshold: Option<f64>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write reports: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    init_tracing("info");
    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(args) => run_fusion(&args),
        Command::Labels { labels } => {
            let catalog = resolve_catalog(labels.as_deref())?;
            for (index, entry) in catalog.entries().iter().enumerate() {
                println!("{index}\t{}\t{}", entry.id, entry.name);
            }
            Ok(())
        }
        Command::Presets => {
            for preset in builtin_presets() {
                println!(
                    "{}\t{}\ttext={}\timage={}",
                    preset.id,
                    preset.name,
                    preset.text_models.join(","),
                    preset.image_models.join(",")
                );
            }
            println!("stand-alone text models: {}", TEXT_MODELS.join(", "));
            println!("stand-alone image models: {}", IMAGE_MODELS.join(", "));
            Ok(())
        }
    }
}

fn run_fusion(args: &RunArgs) -> Result<(), CliError> {
    let config = resolve_config(args)?;
    let catalog = resolve_catalog(args.labels.as_deref())?;
    let requests = load_requests(&args.input)?;

    tracing::info!(
        text_weight = config.weights.text,
        image_weight = config.weights.image,
        gap_threshold = config.gap_threshold,
        n_labels = catalog.len(),
        "fusing requests"
    );

    let entries = fuse_batch(&requests, &catalog, &config);
    write_reports(
        &ReportInput {
            entries: &entries,
            config: &config,
            catalog: &catalog,
            tool: ToolMeta {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        },
        &args.out,
    )?;
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<FusionConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FusionConfig::default(),
    };
    if let Some(w) = args.text_weight {
        config.weights.text = w;
    }
    if let Some(w) = args.image_weight {
        config.weights.image = w;
    }
    if let Some(t) = args.gap_threshold {
        config.gap_threshold = t;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_catalog(path: Option<&Path>) -> Result<LabelCatalog, InputError> {
    match path {
        Some(path) => load_catalog(path),
        None => Ok(LabelCatalog::builtin()),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
