//! Quantizing whole tensors. Each element is independent; output order always matches input order.

use crate::error::{BatchError, RangeError};
use crate::fixed::{QFormat, Quantized};

/// Quantize every element, keeping per-element failures so the caller can
/// decide between aborting and skipping.
pub fn quantize_all(values: &[f64], format: QFormat) -> Vec<Result<Quantized, RangeError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        values.par_iter().map(|&v| format.quantize(v)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        values.iter().map(|&v| format.quantize(v)).collect()
    }
}

/// Quantize every element or report the first one that does not fit.
pub fn try_quantize_all(values: &[f64], format: QFormat) -> Result<Vec<Quantized>, BatchError> {
    quantize_all(values, format)
        .into_iter()
        .enumerate()
        .map(|(index, r)| r.map_err(|source| BatchError { index, source }))
        .collect()
}
