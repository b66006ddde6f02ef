//! `nmx inspect` -- Summarize a model dump.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nmx_export::{summarize, InspectOptions, InspectView, ModelDump, WeightCount};

#[derive(Args)]
pub struct InspectArgs {
    /// Model dump (JSON)
    #[arg(short, long, default_value = "model_data.json")]
    model: PathBuf,
    /// Only show weights, not topology or LIF parameters
    #[arg(long)]
    weights_only: bool,
    /// Only this layer
    #[arg(short, long)]
    layer: Option<String>,
    /// Weights per layer: a number, 'sample' (5) or 'all'
    #[arg(short = 'n', long, default_value = "sample")]
    count: WeightCount,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let model = ModelDump::from_path(&args.model)
        .with_context(|| format!("reading model dump {}", args.model.display()))?;
    let opts = InspectOptions {
        view: if args.weights_only {
            InspectView::Weights
        } else {
            InspectView::Full
        },
        layer: args.layer,
        count: args.count,
    };
    let summary = summarize(&model, &opts)?;

    if args.json {
        crate::output::print_json(&summary)?;
    } else {
        print!("{summary}");
    }
    Ok(())
}
