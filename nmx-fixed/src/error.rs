use thiserror::Error;

use crate::fixed::QFormat;

/// A value whose scaled, rounded form does not fit the signed word of `format`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error(
    "value {value} does not fit in {format} ({} integer bits, {} fractional bits)",
    .format.int_bits(),
    .format.frac_bits()
)]
pub struct RangeError {
    pub value: f64,
    pub format: QFormat,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("a signed fixed-point format needs at least one integer bit")]
    NoIntegerBits,

    #[error("format Q{int_bits}.{frac_bits} is wider than {} bits", crate::fixed::MAX_TOTAL_BITS)]
    TooWide { int_bits: u32, frac_bits: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty hex token")]
    Empty,

    #[error("invalid hex token '{0}'")]
    InvalidHex(String),

    #[error("hex token '{token}' does not fit in {format}")]
    TooWide { token: String, format: QFormat },

    #[error("unknown hex style '{0}' (expected 'prefixed' or 'padded')")]
    UnknownStyle(String),
}

/// First failing element of a batch, by position in the input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("element {index}: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: RangeError,
}
