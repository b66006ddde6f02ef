//! `nmx export-weights` -- Write one layer of a model dump as a `$readmemh` file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nmx_export::{export_weights_to_path, ExportConfig, ModelDump, RangePolicy};

use super::FormatArgs;

#[derive(Args)]
pub struct ExportWeightsArgs {
    /// Model dump (JSON with model_state_dict)
    #[arg(short, long, default_value = "model_data.json")]
    model: PathBuf,
    /// Layer to export
    #[arg(short, long, default_value = "fc2.weight")]
    layer: String,
    /// Output .dat file
    #[arg(short, long, default_value = "weights_fc2.dat")]
    output: PathBuf,
    #[command(flatten)]
    format: FormatArgs,
    /// Leave out-of-range weights out of the file instead of failing
    #[arg(long)]
    skip_out_of_range: bool,
    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ExportWeightsArgs, config: &ExportConfig) -> Result<()> {
    let mut opts = args.format.resolve(config)?;
    if args.skip_out_of_range {
        opts.policy = RangePolicy::Skip;
    }

    let model = ModelDump::from_path(&args.model)
        .with_context(|| format!("reading model dump {}", args.model.display()))?;
    let report = export_weights_to_path(&model, &args.layer, &opts, &args.output)
        .with_context(|| format!("exporting '{}' to {}", args.layer, args.output.display()))?;

    if args.json {
        crate::output::print_json(&report)?;
    } else {
        print!("{report}");
        println!("\nWeights successfully exported to {}", args.output.display());
    }
    Ok(())
}
