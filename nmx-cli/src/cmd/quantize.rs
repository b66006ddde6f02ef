//! `nmx quantize` -- Quantize values given on the command line.

use anyhow::Result;
use clap::Args;
use nmx_export::ExportConfig;
use nmx_fixed::{HexStyle, QFormat};

use super::FormatArgs;

#[derive(Args)]
pub struct QuantizeArgs {
    /// Real values to quantize
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<f64>,
    #[command(flatten)]
    format: FormatArgs,
    /// Also print the signed scaled integer and the decoded value
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: QuantizeArgs, config: &ExportConfig) -> Result<()> {
    let opts = args.format.resolve(config)?;
    for line in render_lines(&args.values, opts.format, opts.style, args.verbose)? {
        println!("{line}");
    }
    Ok(())
}

/// One output line per value; fails on the first value that does not fit.
fn render_lines(
    values: &[f64],
    format: QFormat,
    style: HexStyle,
    verbose: bool,
) -> Result<Vec<String>> {
    values
        .iter()
        .map(|&v| -> Result<String> {
            let q = format.quantize(v)?;
            let token = q.render(style);
            Ok(if verbose {
                format!("{v}\t{token}\t{}\t{}", q.signed(), q.to_f64())
            } else {
                token
            })
        })
        .collect()
}
