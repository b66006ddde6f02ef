//! `nmx verify` -- Decode a `.dat` file back to real values.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nmx_export::{read_dat, ExportConfig};
use nmx_fixed::Quantized;
use serde::Serialize;

use super::FormatArgs;

#[derive(Args)]
pub struct VerifyArgs {
    /// .dat file to decode
    #[arg(short, long)]
    dat: PathBuf,
    #[command(flatten)]
    format: FormatArgs,
    /// Print count/min/max/mean instead of every value
    #[arg(long)]
    summary: bool,
    /// Output the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Serialize)]
struct DatSummary {
    format: String,
    count: usize,
    min: f64,
    max: f64,
    mean: f64,
}

fn summarize(values: &[Quantized]) -> Option<DatSummary> {
    let first = values.first()?;
    let decoded: Vec<f64> = values.iter().map(Quantized::to_f64).collect();
    let min = decoded.iter().copied().fold(f64::INFINITY, f64::min);
    let max = decoded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = decoded.iter().sum::<f64>() / decoded.len() as f64;
    Some(DatSummary {
        format: first.format().to_string(),
        count: decoded.len(),
        min,
        max,
        mean,
    })
}

pub fn run(args: VerifyArgs, config: &ExportConfig) -> Result<()> {
    let opts = args.format.resolve(config)?;
    let file = File::open(&args.dat).with_context(|| format!("opening {}", args.dat.display()))?;
    let values = read_dat(BufReader::new(file), opts.format)
        .with_context(|| format!("decoding {}", args.dat.display()))?;

    if !args.summary && !args.json {
        for q in &values {
            println!("{}", q.to_f64());
        }
        return Ok(());
    }

    match summarize(&values) {
        Some(s) if args.json => crate::output::print_json(&s)?,
        Some(s) => crate::output::print_kv(
            &format!("Decoded {}:", args.dat.display()),
            &[
                ("Format", s.format),
                ("Count", s.count.to_string()),
                ("Min", s.min.to_string()),
                ("Max", s.max.to_string()),
                ("Mean", format!("{:.6}", s.mean)),
            ],
        ),
        None => println!("No values in {}.", args.dat.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmx_fixed::QFormat;

    #[test]
    fn summary_stats() {
        let f = QFormat::Q2_14;
        let values: Vec<Quantized> = [0.5, -1.0, 1.5].iter().map(|&v| f.quantize(v).unwrap()).collect();
        let s = summarize(&values).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.min, -1.0);
        assert_eq!(s.max, 1.5);
        assert!((s.mean - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.format, "Q2.14");
        assert!(summarize(&[]).is_none());
    }
}
