use nmx_fixed::{FormatError, ParseError, RangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("weight [{row}][{col}]: {source}")]
    Range {
        row: usize,
        col: usize,
        #[source]
        source: RangeError,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("layer '{0}' not found in the model's state dict")]
    LayerNotFound(String),

    #[error("bad shape for '{name}': {reason}")]
    Shape { name: String, reason: String },

    #[error("{what} {index} is out of bounds (have {len})")]
    OutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("spike at flat index {index} is {value}, expected 0 or 1")]
    InvalidSpike { index: usize, value: f64 },

    #[error("no time steps requested")]
    NoSteps,
}

impl ExportError {
    pub(crate) fn shape(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ExportError::Shape {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ExportError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use nmx_fixed::QFormat;

    #[test]
    fn display_messages() {
        assert_eq!(
            ExportError::LayerNotFound("fc3.weight".into()).to_string(),
            "layer 'fc3.weight' not found in the model's state dict"
        );
        assert_eq!(
            ExportError::OutOfBounds { what: "sample", index: 12, len: 10 }.to_string(),
            "sample 12 is out of bounds (have 10)"
        );
        assert_eq!(ExportError::NoSteps.to_string(), "no time steps requested");
        assert_eq!(
            ExportError::shape("fc1.weight", "expected 2 dimensions, got 1").to_string(),
            "bad shape for 'fc1.weight': expected 2 dimensions, got 1"
        );
    }

    #[test]
    fn range_error_keeps_position_and_source() {
        let source = RangeError { value: 2.5, format: QFormat::Q2_14 };
        let err = ExportError::Range { row: 1, col: 7, source };
        assert!(err.to_string().starts_with("weight [1][7]: value 2.5"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
