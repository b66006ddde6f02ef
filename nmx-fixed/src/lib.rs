//! nmx-fixed: signed Q(I).(F) fixed-point quantizer for hardware weight export
//!
//! A real value is scaled by 2^F, rounded half-to-even, range checked against
//! the signed W = I + F bit word, then stored in two's complement. Tokens are
//! rendered either as `0x`-prefixed lowercase hex or as zero-padded uppercase
//! hex suitable for `$readmemh`.

pub mod batch;
pub mod error;
pub mod fixed;
pub mod hex;

// Re-exports
pub use batch::{quantize_all, try_quantize_all};
pub use error::{BatchError, FormatError, ParseError, RangeError};
pub use fixed::{quantize_hex, QFormat, Quantized, MAX_TOTAL_BITS};
pub use hex::HexStyle;
