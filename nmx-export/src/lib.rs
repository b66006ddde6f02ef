//! nmx-export: turns the JSON dumps of a trained SNN into accelerator inputs
//!
//! - `weights`: one layer's weight matrix -> `$readmemh` `.dat` file via nmx-fixed
//! - `spikes`: rate-encoded spike dump -> FIFO stimulus text
//! - `inspect`: text/JSON summary of a model dump
//! - `config`: `nmx.toml` export settings
//!
//! Loading happens in `model`; everything else works on in-memory dumps and
//! generic writers so it can be driven from tests without touching disk.

pub mod config;
pub mod error;
pub mod inspect;
pub mod model;
pub mod spikes;
pub mod weights;

// Re-exports
pub use config::{ExportConfig, StyleKind};
pub use error::{ExportError, Result};
pub use inspect::{summarize, InspectOptions, InspectView, ModelSummary, WeightCount};
pub use model::{ModelDump, Tensor};
pub use spikes::SpikeDump;
pub use weights::{
    export_weights, export_weights_to_path, read_dat, ExportOptions, ExportReport, RangePolicy,
};
