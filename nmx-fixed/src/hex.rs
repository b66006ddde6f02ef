//! Hex rendering and parsing of quantized words.

use core::str::FromStr;

use crate::error::ParseError;
use crate::fixed::{QFormat, Quantized};

/// How a raw word is written out. The two styles are not interchangeable:
/// `Prefixed` is lowercase with a `0x` prefix and no padding (`0xfff5`, `0x0`),
/// `Padded` is uppercase, zero-padded to at least `digits` characters (`FFF5`, `0000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexStyle {
    Prefixed,
    Padded { digits: usize },
}

impl HexStyle {
    /// Four uppercase digits: one 16-bit synapse word per line.
    pub const PADDED_16: HexStyle = HexStyle::Padded { digits: 4 };

    /// Padded wide enough for every word of `format`.
    pub fn padded_for(format: QFormat) -> Self {
        HexStyle::Padded {
            digits: (format.total_bits() as usize).div_ceil(4),
        }
    }

    pub fn render(&self, raw: u64) -> String {
        match *self {
            HexStyle::Prefixed => format!("{raw:#x}"),
            HexStyle::Padded { digits } => format!("{raw:0digits$X}"),
        }
    }
}

impl Default for HexStyle {
    fn default() -> Self {
        Self::PADDED_16
    }
}

impl FromStr for HexStyle {
    type Err = ParseError;

    /// `prefixed` / `0x`, or `padded` (4 digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefixed" | "0x" => Ok(HexStyle::Prefixed),
            "padded" => Ok(HexStyle::PADDED_16),
            _ => Err(ParseError::UnknownStyle(s.to_string())),
        }
    }
}

/// Parse a token in either style. Accepts an optional `0x`/`0X` prefix and any digit case.
pub fn parse_token(token: &str, format: QFormat) -> Result<Quantized, ParseError> {
    let t = token.trim();
    let digits = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .unwrap_or(t);
    if digits.is_empty() {
        return Err(ParseError::Empty);
    }
    let raw = u64::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidHex(t.to_string()))?;
    Quantized::from_raw(raw, format).map_err(|_| ParseError::TooWide {
        token: t.to_string(),
        format,
    })
}
