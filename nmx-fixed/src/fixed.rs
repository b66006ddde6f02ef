//! Fixed-point format descriptor and the quantizer itself.

use core::fmt;

use crate::error::{FormatError, ParseError, RangeError};
use crate::hex::HexStyle;

/// Widest word we can hold: the two's-complement pattern lives in a `u64`.
pub const MAX_TOTAL_BITS: u32 = 64;

/// Signed fixed-point format with `int_bits` integer bits (sign included)
/// and `frac_bits` fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QFormat {
    int_bits: u32,
    frac_bits: u32,
}

impl QFormat {
    /// Default weight format of the accelerator's synapse memory.
    pub const Q2_14: QFormat = QFormat { int_bits: 2, frac_bits: 14 };
    pub const Q3_13: QFormat = QFormat { int_bits: 3, frac_bits: 13 };

    pub fn new(int_bits: u32, frac_bits: u32) -> Result<Self, FormatError> {
        if int_bits == 0 {
            return Err(FormatError::NoIntegerBits);
        }
        match int_bits.checked_add(frac_bits) {
            Some(total) if total <= MAX_TOTAL_BITS => Ok(Self { int_bits, frac_bits }),
            _ => Err(FormatError::TooWide { int_bits, frac_bits }),
        }
    }

    #[inline]
    pub fn int_bits(&self) -> u32 {
        self.int_bits
    }

    #[inline]
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    #[inline]
    pub fn total_bits(&self) -> u32 {
        self.int_bits + self.frac_bits
    }

    /// 2^frac_bits
    #[inline]
    pub fn scale(&self) -> f64 {
        2f64.powi(self.frac_bits as i32)
    }

    /// Real-valued weight of one least significant bit.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.scale().recip()
    }

    /// Largest representable scaled integer, 2^(W-1) - 1.
    pub fn max_value(&self) -> i64 {
        ((1i128 << (self.total_bits() - 1)) - 1) as i64
    }

    /// Smallest representable scaled integer, -2^(W-1).
    pub fn min_value(&self) -> i64 {
        (-(1i128 << (self.total_bits() - 1))) as i64
    }

    /// Bit mask covering the whole W-bit word.
    #[inline]
    pub fn mask(&self) -> u64 {
        if self.total_bits() == 64 {
            u64::MAX
        } else {
            (1u64 << self.total_bits()) - 1
        }
    }

    /// Quantize `value` into this format.
    ///
    /// The scaled value is rounded half to even, so `0.5 / scale` quantizes
    /// to 0 and `1.5 / scale` to 2. Values whose rounded form falls outside
    /// `[min_value, max_value]` are rejected, never clamped or wrapped.
    /// NaN and infinities are always out of range.
    pub fn quantize(&self, value: f64) -> Result<Quantized, RangeError> {
        let scaled = (value * self.scale()).round_ties_even();
        if !scaled.is_finite() {
            return Err(RangeError { value, format: *self });
        }

        // Float to int casts saturate; i128 leaves room to detect overflow of any W <= 64.
        let scaled = scaled as i128;
        if scaled > self.max_value() as i128 || scaled < self.min_value() as i128 {
            return Err(RangeError { value, format: *self });
        }

        Ok(Quantized {
            raw: self.encode(scaled as i64),
            format: *self,
        })
    }

    /// Two's-complement pattern of an in-range signed integer: negative values map to 2^W + n.
    #[inline]
    fn encode(&self, signed: i64) -> u64 {
        if signed < 0 {
            ((1i128 << self.total_bits()) + signed as i128) as u64
        } else {
            signed as u64
        }
    }

    /// Parse a token in either rendering (`0xfff5` or `FFF5`) back into this format.
    pub fn decode_hex(&self, token: &str) -> Result<Quantized, ParseError> {
        crate::hex::parse_token(token, *self)
    }
}

impl Default for QFormat {
    fn default() -> Self {
        Self::Q2_14
    }
}

impl fmt::Display for QFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{}", self.int_bits, self.frac_bits)
    }
}

/// A quantized value: the raw W-bit two's-complement word and its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantized {
    raw: u64,
    format: QFormat,
}

impl Quantized {
    /// Wrap an existing word. Fails if `raw` has bits set above the format's width.
    pub fn from_raw(raw: u64, format: QFormat) -> Result<Self, ParseError> {
        if raw & !format.mask() != 0 {
            return Err(ParseError::TooWide {
                token: format!("{raw:#x}"),
                format,
            });
        }
        Ok(Self { raw, format })
    }

    /// Unsigned two's-complement word, as written to the `.dat` file.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.raw
    }

    #[inline]
    pub fn format(&self) -> QFormat {
        self.format
    }

    /// Signed scaled integer, i.e. round(value * 2^F).
    pub fn signed(&self) -> i64 {
        let total = self.format.total_bits();
        let sign_bit = 1u64 << (total - 1);
        if self.raw & sign_bit != 0 {
            (self.raw as i128 - (1i128 << total)) as i64
        } else {
            self.raw as i64
        }
    }

    /// Decode back to a real value.
    pub fn to_f64(&self) -> f64 {
        self.signed() as f64 / self.format.scale()
    }

    pub fn render(&self, style: HexStyle) -> String {
        style.render(self.raw)
    }
}

impl fmt::Display for Quantized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(HexStyle::padded_for(self.format)))
    }
}

/// Quantize and render in one step.
pub fn quantize_hex(value: f64, format: QFormat, style: HexStyle) -> Result<String, RangeError> {
    format.quantize(value).map(|q| q.render(style))
}
