//! Property-based tests for the quantizer.

use nmx_fixed::{HexStyle, QFormat};
use proptest::prelude::*;

// Formats up to 32 bits wide keep scaled values exactly representable in f64.
fn format_strategy() -> impl Strategy<Value = QFormat> {
    (1u32..=16, 0u32..=16).prop_map(|(ib, fb)| QFormat::new(ib, fb).unwrap())
}

// A format plus a value inside its representable range.
fn in_range_strategy() -> impl Strategy<Value = (QFormat, f64)> {
    format_strategy().prop_flat_map(|f| {
        let lo = f.min_value() as f64 / f.scale();
        let hi = f.max_value() as f64 / f.scale();
        (Just(f), lo..=hi)
    })
}

proptest! {
    // Property: decoding recovers the value within half an LSB
    #[test]
    fn decode_within_half_lsb((f, v) in in_range_strategy()) {
        let q = f.quantize(v).unwrap();
        let err = (q.to_f64() - v).abs();
        prop_assert!(err <= f.resolution() / 2.0, "{} -> {} in {}", v, q.to_f64(), f);
    }

    // Property: zero always encodes to the all-zero word
    #[test]
    fn zero_encodes_to_zero(f in format_strategy()) {
        prop_assert_eq!(f.quantize(0.0).unwrap().raw(), 0);
        prop_assert_eq!(f.quantize(0.0).unwrap().render(HexStyle::Prefixed), "0x0");
    }

    // Property: the raw word never exceeds the format width
    #[test]
    fn raw_fits_width((f, v) in in_range_strategy()) {
        let q = f.quantize(v).unwrap();
        prop_assert_eq!(q.raw() & !f.mask(), 0);
    }

    // Property: one LSB past either end is rejected, the ends themselves are not
    #[test]
    fn range_edges(f in format_strategy()) {
        let scale = f.scale();
        prop_assert!(f.quantize(f.max_value() as f64 / scale).is_ok());
        prop_assert!(f.quantize(f.min_value() as f64 / scale).is_ok());
        prop_assert!(f.quantize((f.max_value() + 1) as f64 / scale).is_err());
        prop_assert!(f.quantize((f.min_value() - 1) as f64 / scale).is_err());
    }

    // Property: padded output of a <=16-bit format is exactly four uppercase hex digits
    #[test]
    fn padded_is_four_uppercase_digits(
        (f, v) in (1u32..=8, 0u32..=8)
            .prop_map(|(ib, fb)| QFormat::new(ib, fb).unwrap())
            .prop_flat_map(|f| {
                let lo = f.min_value() as f64 / f.scale();
                let hi = f.max_value() as f64 / f.scale();
                (Just(f), lo..=hi)
            })
    ) {
        let token = f.quantize(v).unwrap().render(HexStyle::PADDED_16);
        prop_assert_eq!(token.len(), 4);
        prop_assert!(token.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    // Property: both renderings parse back to the same word
    #[test]
    fn both_styles_parse_back((f, v) in in_range_strategy()) {
        let q = f.quantize(v).unwrap();
        prop_assert_eq!(f.decode_hex(&q.render(HexStyle::Prefixed)).unwrap(), q);
        prop_assert_eq!(f.decode_hex(&q.render(HexStyle::padded_for(f))).unwrap(), q);
    }

    // Property: quantization is monotonic
    #[test]
    fn monotonic((f, a) in in_range_strategy(), t in 0.0f64..=1.0) {
        let hi = f.max_value() as f64 / f.scale();
        let b = a + (hi - a) * t;
        let qa = f.quantize(a).unwrap().signed();
        let qb = f.quantize(b).unwrap().signed();
        prop_assert!(qa <= qb);
    }
}
