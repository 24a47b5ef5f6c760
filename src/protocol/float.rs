//! IEEE-754 float wire codec
//!
//! Floats are built from their sign, exponent, and fraction fields without
//! reinterpreting the native representation. The magnitude is split with a
//! frexp-style decomposition, the fraction bits are peeled off by repeated
//! doubling, and the fields are inserted into an integer word.
//!
//! # Byte layout
//!
//! The word is treated as a bit sequence `sign, exponent (MSB first),
//! fraction (MSB first)` and laid into bytes eight bits at a time, the first
//! bit of each group landing in bit 0 of its byte. For little endian the
//! whole sequence is reversed before packing.
//!
//! ```text
//! 1.0_f32 little-endian: 00 00 80 3F   (standard IEEE image)
//! 1.0_f32 big-endian:    FC 01 00 00   (IEEE big-endian image, bits mirrored per byte)
//! ```
//!
//! # Edge cases
//!
//! | class     | exponent field | fraction field        |
//! |-----------|----------------|-----------------------|
//! | zero      | 0              | 0 (sign kept)         |
//! | subnormal | 0              | denormalised fraction |
//! | infinite  | all ones       | 0                     |
//! | NaN       | all ones       | quiet bit only        |

use bytes::BytesMut;

use super::{Endianness, WireValue};

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
const TWO_POW_NEG_64: f64 = 1.0 / TWO_POW_64;

/// Field widths of an IEEE-754 binary format
struct Format {
    exp_bits: u32,
    frac_bits: u32,
    bias: i32,
}

const BINARY32: Format = Format {
    exp_bits: 8,
    frac_bits: 23,
    bias: 127,
};

const BINARY64: Format = Format {
    exp_bits: 11,
    frac_bits: 52,
    bias: 1023,
};

impl Format {
    const fn width_bits(&self) -> u32 {
        1 + self.exp_bits + self.frac_bits
    }

    const fn width_bytes(&self) -> usize {
        (self.width_bits() / 8) as usize
    }

    const fn exp_max(&self) -> u64 {
        (1 << self.exp_bits) - 1
    }

    fn min_normal(&self) -> f64 {
        ldexp(1.0, 1 - self.bias)
    }
}

/// Float classification used to pick the encoding branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatClass {
    /// Positive or negative zero
    Zero,
    /// Below the smallest normal magnitude
    Subnormal,
    /// Normal finite value
    Normal,
    /// Positive or negative infinity
    Infinite,
    /// Not a number
    Nan,
}

/// Classify a binary32 value
#[must_use]
pub fn classify_f32(value: f32) -> FloatClass {
    classify(f64::from(value), &BINARY32)
}

/// Classify a binary64 value
#[must_use]
pub fn classify_f64(value: f64) -> FloatClass {
    classify(value, &BINARY64)
}

fn classify(value: f64, format: &Format) -> FloatClass {
    if value.is_nan() {
        FloatClass::Nan
    } else if value.is_infinite() {
        FloatClass::Infinite
    } else if value == 0.0 {
        FloatClass::Zero
    } else if value.abs() < format.min_normal() {
        FloatClass::Subnormal
    } else {
        FloatClass::Normal
    }
}

/// Split a positive finite non-zero magnitude into `(mantissa, exponent)`
/// with `mantissa` in `[0.5, 1)`.
fn frexp(magnitude: f64) -> (f64, i32) {
    let mut mantissa = magnitude;
    let mut exponent = 0;

    while mantissa >= TWO_POW_64 {
        mantissa *= TWO_POW_NEG_64;
        exponent += 64;
    }
    while mantissa < TWO_POW_NEG_64 {
        mantissa *= TWO_POW_64;
        exponent -= 64;
    }
    while mantissa >= 1.0 {
        mantissa *= 0.5;
        exponent += 1;
    }
    while mantissa < 0.5 {
        mantissa *= 2.0;
        exponent -= 1;
    }

    (mantissa, exponent)
}

/// `value * 2^exponent`, exact whenever the result is representable.
fn ldexp(mut value: f64, mut exponent: i32) -> f64 {
    while exponent > 64 {
        value *= TWO_POW_64;
        exponent -= 64;
    }
    while exponent < -64 {
        value *= TWO_POW_NEG_64;
        exponent += 64;
    }
    while exponent > 0 {
        value *= 2.0;
        exponent -= 1;
    }
    while exponent < 0 {
        value *= 0.5;
        exponent += 1;
    }
    value
}

/// First `count` binary digits of `fraction` in `[0, 1)`, MSB first.
fn fraction_bits(mut fraction: f64, count: u32) -> u64 {
    let mut bits = 0u64;
    for _ in 0..count {
        fraction *= 2.0;
        bits <<= 1;
        if fraction >= 1.0 {
            fraction -= 1.0;
            bits |= 1;
        }
    }
    bits
}

/// `leading + Σ bit_i * 2^-i` over the fraction field, MSB first.
fn fraction_value(fraction: u64, count: u32, leading: f64) -> f64 {
    let mut mantissa = leading;
    let mut weight = 0.5;
    for i in (0..count).rev() {
        if (fraction >> i) & 1 == 1 {
            mantissa += weight;
        }
        weight *= 0.5;
    }
    mantissa
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn encode_word(value: f64, format: &Format) -> u64 {
    let sign = u64::from(value.is_sign_negative());

    let (exponent, fraction) = match classify(value, format) {
        FloatClass::Zero => (0, 0),
        FloatClass::Infinite => (format.exp_max(), 0),
        FloatClass::Nan => (format.exp_max(), 1 << (format.frac_bits - 1)),
        FloatClass::Normal => {
            let (mantissa, e) = frexp(value.abs());
            let biased = (e - 1) + format.bias;
            (
                biased as u64,
                fraction_bits(mantissa * 2.0 - 1.0, format.frac_bits),
            )
        }
        FloatClass::Subnormal => {
            let (mantissa, e) = frexp(value.abs());
            // magnitude = fraction * 2^(1 - bias - frac_bits)
            let shift = (e - 1) + format.bias + format.frac_bits as i32;
            (0, fraction_bits(mantissa, u32::try_from(shift).unwrap_or(0)))
        }
    };

    (sign << (format.exp_bits + format.frac_bits)) | (exponent << format.frac_bits) | fraction
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn decode_word(word: u64, format: &Format) -> f64 {
    let negative = (word >> (format.exp_bits + format.frac_bits)) & 1 == 1;
    let exponent = (word >> format.frac_bits) & format.exp_max();
    let fraction = word & ((1 << format.frac_bits) - 1);

    let magnitude = if exponent == format.exp_max() {
        if fraction == 0 { f64::INFINITY } else { f64::NAN }
    } else if exponent == 0 {
        ldexp(fraction_value(fraction, format.frac_bits, 0.0), 1 - format.bias)
    } else {
        ldexp(
            fraction_value(fraction, format.frac_bits, 1.0),
            exponent as i32 - format.bias,
        )
    };

    if negative { -magnitude } else { magnitude }
}

fn pack(word: u64, format: &Format, endian: Endianness, dst: &mut BytesMut) {
    let image = match endian {
        Endianness::Big => word.reverse_bits() >> (64 - format.width_bits()),
        Endianness::Little => word,
    };
    dst.extend_from_slice(&image.to_le_bytes()[..format.width_bytes()]);
}

fn unpack(src: &[u8], format: &Format, endian: Endianness) -> Option<u64> {
    let mut raw = [0u8; 8];
    raw[..format.width_bytes()].copy_from_slice(src.get(..format.width_bytes())?);
    let image = u64::from_le_bytes(raw);
    Some(match endian {
        Endianness::Big => image.reverse_bits() >> (64 - format.width_bits()),
        Endianness::Little => image,
    })
}

impl WireValue for f32 {
    const WIDTH: usize = BINARY32.width_bytes();

    fn encode_wire(self, endian: Endianness, dst: &mut BytesMut) {
        pack(encode_word(f64::from(self), &BINARY32), &BINARY32, endian, dst);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode_wire(src: &[u8], endian: Endianness) -> Option<Self> {
        unpack(src, &BINARY32, endian).map(|word| decode_word(word, &BINARY32) as f32)
    }
}

impl WireValue for f64 {
    const WIDTH: usize = BINARY64.width_bytes();

    fn encode_wire(self, endian: Endianness, dst: &mut BytesMut) {
        pack(encode_word(self, &BINARY64), &BINARY64, endian, dst);
    }

    fn decode_wire(src: &[u8], endian: Endianness) -> Option<Self> {
        unpack(src, &BINARY64, endian).map(|word| decode_word(word, &BINARY64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode, encode};

    #[test]
    fn test_golden_binary32() {
        assert_eq!(encode(1.0_f32, Endianness::Little), [0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(encode(1.0_f32, Endianness::Big), [0xFC, 0x01, 0x00, 0x00]);
        assert_eq!(encode(-2.5_f32, Endianness::Big), [0x03, 0x04, 0x00, 0x00]);
    }

    #[test]
    fn test_golden_binary64() {
        assert_eq!(
            encode(1.0_f64, Endianness::Big),
            [0xFC, 0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode(-0.15625_f64, Endianness::Little),
            [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC4, 0xBF]
        );
    }

    #[test]
    fn test_zero_keeps_sign() {
        assert_eq!(encode(0.0_f32, Endianness::Little), [0, 0, 0, 0]);
        assert_eq!(encode(-0.0_f32, Endianness::Little), [0, 0, 0, 0x80]);
        assert_eq!(encode(-0.0_f32, Endianness::Big), [0x01, 0, 0, 0]);

        let decoded: f64 = decode(&encode(-0.0_f64, Endianness::Big), 0, Endianness::Big).unwrap();
        assert_eq!(decoded, 0.0);
        assert!(decoded.is_sign_negative());
    }

    #[test]
    fn test_special_values() {
        assert_eq!(
            encode(f32::INFINITY, Endianness::Little),
            [0x00, 0x00, 0x80, 0x7F]
        );
        assert_eq!(
            encode(f32::NEG_INFINITY, Endianness::Little),
            [0x00, 0x00, 0x80, 0xFF]
        );
        assert_eq!(
            encode(f32::NAN.abs(), Endianness::Little),
            [0x00, 0x00, 0xC0, 0x7F]
        );

        let inf: f64 = decode(
            &encode(f64::NEG_INFINITY, Endianness::Big),
            0,
            Endianness::Big,
        )
        .unwrap();
        assert_eq!(inf, f64::NEG_INFINITY);

        let nan: f32 = decode(&encode(f32::NAN, Endianness::Big), 0, Endianness::Big).unwrap();
        assert!(nan.is_nan());
    }

    #[test]
    fn test_subnormals() {
        let smallest = f32::from_bits(1);
        assert_eq!(classify_f32(smallest), FloatClass::Subnormal);
        assert_eq!(encode(smallest, Endianness::Little), [0x01, 0x00, 0x00, 0x00]);

        let smallest = f64::from_bits(1);
        assert_eq!(classify_f64(smallest), FloatClass::Subnormal);
        let bytes = encode(smallest, Endianness::Big);
        let decoded: f64 = decode(&bytes, 0, Endianness::Big).unwrap();
        assert_eq!(decoded.to_bits(), 1);
    }

    #[test]
    fn test_decode_wire_short_slice() {
        assert_eq!(f64::decode_wire(&[0, 0, 0, 0], Endianness::Little), None);
        assert_eq!(f32::decode_wire(&[0x3F], Endianness::Big), None);
        assert_eq!(
            f32::decode_wire(&[0x00, 0x00, 0x80, 0x3F, 0xEE], Endianness::Little),
            Some(1.0)
        );
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify_f32(0.0), FloatClass::Zero);
        assert_eq!(classify_f32(f32::MIN_POSITIVE), FloatClass::Normal);
        assert_eq!(classify_f64(f64::MAX), FloatClass::Normal);
        assert_eq!(classify_f64(f64::INFINITY), FloatClass::Infinite);
        assert_eq!(classify_f64(f64::NAN), FloatClass::Nan);
        // f32 range decides the class, not the f64 widening
        assert_eq!(classify_f32(f32::MIN_POSITIVE / 2.0), FloatClass::Subnormal);
    }

    #[test]
    fn test_extremes_roundtrip() {
        for value in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, f64::EPSILON] {
            for endian in [Endianness::Big, Endianness::Little] {
                let decoded: f64 = decode(&encode(value, endian), 0, endian).unwrap();
                assert_eq!(decoded.to_bits(), value.to_bits());
            }
        }
        for value in [f32::MAX, f32::MIN, f32::MIN_POSITIVE, f32::EPSILON] {
            for endian in [Endianness::Big, Endianness::Little] {
                let decoded: f32 = decode(&encode(value, endian), 0, endian).unwrap();
                assert_eq!(decoded.to_bits(), value.to_bits());
            }
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn finite_f32() -> impl Strategy<Value = f32> {
            any::<u32>()
                .prop_map(f32::from_bits)
                .prop_filter("finite", |v| v.is_finite())
        }

        fn finite_f64() -> impl Strategy<Value = f64> {
            any::<u64>()
                .prop_map(f64::from_bits)
                .prop_filter("finite", |v| v.is_finite())
        }

        fn endian_strategy() -> impl Strategy<Value = Endianness> {
            prop_oneof![Just(Endianness::Big), Just(Endianness::Little)]
        }

        proptest! {
            #[test]
            fn prop_f32_roundtrip(v in finite_f32(), endian in endian_strategy()) {
                let decoded: f32 = decode(&encode(v, endian), 0, endian).unwrap();
                prop_assert_eq!(decoded.to_bits(), v.to_bits());
            }

            #[test]
            fn prop_f64_roundtrip(v in finite_f64(), endian in endian_strategy()) {
                let decoded: f64 = decode(&encode(v, endian), 0, endian).unwrap();
                prop_assert_eq!(decoded.to_bits(), v.to_bits());
            }

            #[test]
            fn prop_little_endian_is_ieee(v in finite_f64()) {
                prop_assert_eq!(encode(v, Endianness::Little), v.to_le_bytes().to_vec());
            }

            // IEEE big-endian image, bits mirrored per byte
            #[test]
            fn prop_big_endian_bits_mirrored(v in finite_f32()) {
                let expected: Vec<u8> = v.to_be_bytes().iter().map(|b| b.reverse_bits()).collect();
                prop_assert_eq!(encode(v, Endianness::Big), expected);
            }
        }
    }
}
