//! `nmx`: quantize SNN weights for `$readmemh`, export spike FIFOs, inspect dumps.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nmx_export::ExportConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod output;

#[derive(Parser)]
#[command(name = "nmx", version, about = "Fixed-point weight export and spike tooling for SNN hardware")]
struct Cli {
    /// Export settings file (TOML); flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantize values and print one hex token per value
    Quantize(cmd::quantize::QuantizeArgs),
    /// Export one layer of a model dump to a .dat file
    ExportWeights(cmd::export_weights::ExportWeightsArgs),
    /// Export steps of one sample of a spike dump as FIFO stimulus
    ExportSpikes(cmd::export_spikes::ExportSpikesArgs),
    /// Summarize a model dump
    Inspect(cmd::inspect::InspectArgs),
    /// Decode a .dat file back to real values
    Verify(cmd::verify::VerifyArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries tokens and reports
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nmx=info,nmx_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ExportConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExportConfig::default(),
    };
    tracing::debug!(?config, "export config");

    match cli.command {
        Commands::Quantize(args) => cmd::quantize::run(args, &config),
        Commands::ExportWeights(args) => cmd::export_weights::run(args, &config),
        Commands::ExportSpikes(args) => cmd::export_spikes::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
        Commands::Verify(args) => cmd::verify::run(args, &config),
    }
}
