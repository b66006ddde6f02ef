//! `nmx export-spikes` -- Write steps of one sample as FIFO stimulus.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nmx_export::SpikeDump;

#[derive(Args)]
pub struct ExportSpikesArgs {
    /// Spike dump (JSON with spiking_input and labels)
    #[arg(long, default_value = "exported_spiking_input.json")]
    input: PathBuf,
    /// Sample index within the batch
    #[arg(long)]
    sample: usize,
    /// Time steps to export, in order (0-based, comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
    steps: Vec<usize>,
    /// Output file [default: fifo_data_sample_<SAMPLE>.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExportSpikesArgs) -> Result<()> {
    let dump = SpikeDump::from_path(&args.input)
        .with_context(|| format!("reading spike dump {}", args.input.display()))?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("fifo_data_sample_{}.txt", args.sample)));

    let lines = dump.export_fifo_to_path(&args.steps, args.sample, &output)?;

    let mut rows = vec![("Lines", lines.to_string())];
    if let Some(label) = dump.label(args.sample) {
        rows.push(("Label", label.to_string()));
    }
    crate::output::print_kv(
        &format!(
            "Data for steps {:?} and sample {} successfully exported to {}",
            args.steps,
            args.sample,
            output.display()
        ),
        &rows,
    );
    Ok(())
}
