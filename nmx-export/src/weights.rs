//! Weight export to `$readmemh` `.dat` files.
//!
//! One token per line, row-major over `[post][pre]`, no header. The matrix
//! shape is not stored; the consumer must know it.

use core::fmt;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use nmx_fixed::{quantize_all, try_quantize_all, HexStyle, QFormat, Quantized, RangeError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::model::ModelDump;

/// Number of leading and trailing weights kept in the report preview.
pub const PREVIEW_LEN: usize = 5;

/// What to do with a weight that does not fit the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Fail the whole export; nothing is written.
    #[default]
    Abort,
    /// Leave the weight out of the file and record it in the report.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: QFormat,
    pub style: HexStyle,
    pub policy: RangePolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: QFormat::Q2_14,
            style: HexStyle::PADDED_16,
            policy: RangePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub index: usize,
    pub value: f64,
    /// `None` when the weight was skipped as out of range.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkippedWeight {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub layer: String,
    pub rows: usize,
    pub cols: usize,
    pub format: String,
    pub written: usize,
    pub skipped: Vec<SkippedWeight>,
    pub head: Vec<PreviewEntry>,
    pub tail: Vec<PreviewEntry>,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported layer '{}' with shape [{}, {}] as {}",
            self.layer, self.rows, self.cols, self.format
        )?;
        writeln!(f, "Lines written: {}", self.written)?;
        if !self.skipped.is_empty() {
            writeln!(f, "Skipped (out of range): {}", self.skipped.len())?;
            for s in &self.skipped {
                writeln!(f, "  [{}][{}] = {:.4e}", s.row, s.col, s.value)?;
            }
        }
        writeln!(f)?;
        for p in &self.head {
            write_preview(f, "First", p)?;
        }
        if !self.tail.is_empty() {
            writeln!(f, "...")?;
            for p in &self.tail {
                write_preview(f, "Last", p)?;
            }
        }
        Ok(())
    }
}

fn write_preview(f: &mut fmt::Formatter<'_>, which: &str, p: &PreviewEntry) -> fmt::Result {
    writeln!(
        f,
        "{} values - Original: {:.4}, Hex: {}, Scientific: {:.4e}",
        which,
        p.value,
        p.token.as_deref().unwrap_or("<skipped>"),
        p.value
    )
}

/// One layer quantized under a range policy, not yet written anywhere.
struct QuantizedLayer {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    results: Vec<Result<Quantized, RangeError>>,
}

/// Look up and quantize `layer`. Under `RangePolicy::Abort` the first weight
/// that does not fit is returned as an error here, before any output exists.
fn quantize_layer(model: &ModelDump, layer: &str, opts: &ExportOptions) -> Result<QuantizedLayer> {
    let tensor = model.layer(layer)?;
    let (rows, cols) = tensor.matrix_dims().ok_or_else(|| {
        ExportError::shape(
            layer,
            format!("expected a 2-D weight matrix, got {:?}", tensor.shape()),
        )
    })?;
    debug!(layer, rows, cols, format = %opts.format, "exporting weights");

    let values = tensor.data();
    let results = match opts.policy {
        RangePolicy::Abort => try_quantize_all(values, opts.format)
            .map_err(|e| ExportError::Range {
                row: e.index / cols,
                col: e.index % cols,
                source: e.source,
            })?
            .into_iter()
            .map(Ok)
            .collect(),
        RangePolicy::Skip => quantize_all(values, opts.format),
    };

    Ok(QuantizedLayer {
        rows,
        cols,
        values: values.to_vec(),
        results,
    })
}

fn write_layer<W: Write>(
    layer: &str,
    quantized: QuantizedLayer,
    opts: &ExportOptions,
    mut out: W,
) -> Result<ExportReport> {
    let QuantizedLayer {
        rows,
        cols,
        values,
        results,
    } = quantized;

    let mut tokens: Vec<Option<String>> = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (index, r) in results.iter().enumerate() {
        match r {
            Ok(q) => {
                let token = q.render(opts.style);
                writeln!(out, "{}", token)?;
                tokens.push(Some(token));
            }
            Err(e) => {
                let (row, col) = (index / cols, index % cols);
                warn!(row, col, value = e.value, "weight out of range, skipped");
                skipped.push(SkippedWeight { row, col, value: e.value });
                tokens.push(None);
            }
        }
    }
    out.flush()?;

    let preview = |index: usize| PreviewEntry {
        index,
        value: values[index],
        token: tokens[index].clone(),
    };
    let n = values.len();
    let head: Vec<PreviewEntry> = (0..n.min(PREVIEW_LEN)).map(preview).collect();
    let tail: Vec<PreviewEntry> = (n.saturating_sub(PREVIEW_LEN)..n).map(preview).collect();

    Ok(ExportReport {
        layer: layer.to_string(),
        rows,
        cols,
        format: opts.format.to_string(),
        written: n - skipped.len(),
        skipped,
        head,
        tail,
    })
}

/// Quantize one layer of `model` and write it to `out`.
///
/// With `RangePolicy::Abort` every weight is checked before the first line is
/// written, so a failing export leaves `out` untouched.
pub fn export_weights<W: Write>(
    model: &ModelDump,
    layer: &str,
    opts: &ExportOptions,
    out: W,
) -> Result<ExportReport> {
    let quantized = quantize_layer(model, layer, opts)?;
    write_layer(layer, quantized, opts, out)
}

/// `export_weights` into a file. On abort no file is created.
pub fn export_weights_to_path(
    model: &ModelDump,
    layer: &str,
    opts: &ExportOptions,
    path: impl AsRef<Path>,
) -> Result<ExportReport> {
    let path = path.as_ref();
    let quantized = quantize_layer(model, layer, opts)?;
    let report = write_layer(layer, quantized, opts, BufWriter::new(File::create(path)?))?;
    info!(
        layer,
        lines = report.written,
        skipped = report.skipped.len(),
        path = %path.display(),
        "weights exported"
    );
    Ok(report)
}

/// Read a `.dat` file back. Blank lines and `//` comments are ignored, as `$readmemh` does.
pub fn read_dat<R: BufRead>(reader: R, format: QFormat) -> Result<Vec<Quantized>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let content = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        let q = format
            .decode_hex(content)
            .map_err(|source| ExportError::Parse { line: i + 1, source })?;
        out.push(q);
    }
    Ok(out)
}
