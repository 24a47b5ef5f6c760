//! Frame checksums
//!
//! The ISO-sum is a dual running-sum checksum (Fletcher style, modulo 255)
//! producing two trailer bytes. Appending the trailer makes the sums over
//! data plus trailer vanish modulo 255, which is what verification checks.
//!
//! Any single-bit flip in the covered data is detected. Substituting `0x00`
//! for `0xFF` (or the reverse) is not, since both are zero modulo 255.

use bytes::BytesMut;

use super::{Error, Result};

const MODULUS: u32 = 0xFF;

/// Running sums `(c0, c1)` over `data`, reduced modulo 255
///
/// `c0 = Σ byte`, `c1 = Σ running c0`.
#[must_use]
pub fn iso_sums(data: &[u8]) -> (u32, u32) {
    data.iter().fold((0, 0), |(c0, c1), &byte| {
        let c0 = (c0 + u32::from(byte)) % MODULUS;
        (c0, (c1 + c0) % MODULUS)
    })
}

/// Trailer bytes `[s0, s1]` for `data`
///
/// A zero trailer byte is reserved on the wire and is sent as `0xFF`, which
/// is congruent to it modulo 255.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn iso_sum(data: &[u8]) -> [u8; 2] {
    let (c0, c1) = iso_sums(data);
    let s0 = (MODULUS - (c0 + c1) % MODULUS) % MODULUS;
    let s1 = c1 % MODULUS;
    [nonzero(s0 as u8), nonzero(s1 as u8)]
}

const fn nonzero(byte: u8) -> u8 {
    if byte == 0 { 0xFF } else { byte }
}

fn region(len: usize, data_len: usize, start: usize) -> Result<std::ops::Range<usize>> {
    let end = start.saturating_add(data_len);
    if end > len {
        return Err(Error::BufferTooSmall {
            needed: end,
            got: len,
        });
    }
    Ok(start..end)
}

/// Compute the ISO-sum over `data_len` bytes from `start` and append it
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] if the region runs past the buffer.
pub fn iso_sum_append(buffer: &mut BytesMut, data_len: usize, start: usize) -> Result<()> {
    let range = region(buffer.len(), data_len, start)?;
    let trailer = iso_sum(&buffer[range]);
    buffer.extend_from_slice(&trailer);
    Ok(())
}

/// Verify the ISO-sum trailer that follows `data_len` bytes from `start`
///
/// The trailer bytes must both be non-zero and the running sums over data
/// plus trailer must satisfy `(c0 + c1) ≡ 0` and `c1 ≡ 0` modulo 255.
/// Returns `false` when the region or trailer runs past the buffer.
#[must_use]
pub fn iso_sum_verify(buffer: &[u8], data_len: usize, start: usize) -> bool {
    let Ok(range) = region(buffer.len(), data_len.saturating_add(2), start) else {
        return false;
    };
    let covered = &buffer[range];
    let trailer = &covered[covered.len() - 2..];
    if trailer[0] == 0 || trailer[1] == 0 {
        return false;
    }

    let (c0, c1) = iso_sums(covered);
    (c0 + c1) % MODULUS == 0 && c1 % MODULUS == 0
}

/// Modulo-256 additive checksum over the first `len` bytes
///
/// `len` is clamped to the buffer length.
#[must_use]
pub fn checksum_byte_sum(buffer: &[u8], len: usize) -> u8 {
    buffer[..len.min(buffer.len())]
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_sum_golden() {
        // c0 = 10, c1 = 20
        assert_eq!(iso_sum(&[1, 2, 3, 4]), [0xE1, 0x14]);
        assert_eq!(iso_sum(&[0x10, 0x20]), [0x8F, 0x40]);
    }

    #[test]
    fn test_iso_sum_zero_maps_to_ff() {
        // all sums vanish for empty data
        assert_eq!(iso_sum(&[]), [0xFF, 0xFF]);
        assert_eq!(iso_sum(&[0xFF, 0xFF]), [0xFF, 0xFF]);
    }

    #[test]
    fn test_append_then_verify() {
        let mut buf = BytesMut::from(&b"telemetry"[..]);
        iso_sum_append(&mut buf, 9, 0).unwrap();
        assert_eq!(buf.len(), 11);
        assert!(iso_sum_verify(&buf, 9, 0));
    }

    #[test]
    fn test_verify_with_offset_region() {
        let mut buf = BytesMut::from(&[0xAA, 0x63, 0x03, 0x00, 0x01, 0x02, 0x03, 0x04, 7, 8, 9][..]);
        iso_sum_append(&mut buf, 3, 8).unwrap();
        assert!(iso_sum_verify(&buf, 3, 8));
        // header bytes are outside the region
        buf[4] = 0x55;
        assert!(iso_sum_verify(&buf, 3, 8));
        buf[9] ^= 0x01;
        assert!(!iso_sum_verify(&buf, 3, 8));
    }

    #[test]
    fn test_zero_and_ff_are_indistinguishable() {
        let mut buf = BytesMut::from(&[0x10, 0x00, 0x20][..]);
        iso_sum_append(&mut buf, 3, 0).unwrap();
        buf[1] = 0xFF;
        assert!(iso_sum_verify(&buf, 3, 0));
        buf[1] = 0xFE;
        assert!(!iso_sum_verify(&buf, 3, 0));
    }

    #[test]
    fn test_verify_rejects_zero_trailer() {
        let buf = [0x00, 0x00, 0x00, 0x00];
        // sums vanish, but zero trailer bytes are reserved
        assert!(!iso_sum_verify(&buf, 2, 0));
    }

    #[test]
    fn test_region_out_of_range() {
        let mut buf = BytesMut::from(&[1, 2, 3][..]);
        let result = iso_sum_append(&mut buf, 4, 0);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall { needed: 4, got: 3 })
        ));
        assert_eq!(buf.len(), 3);
        assert!(!iso_sum_verify(&buf, 2, 0));
        assert!(!iso_sum_verify(&buf, 1, usize::MAX));
    }

    #[test]
    fn test_checksum_byte_sum() {
        assert_eq!(checksum_byte_sum(&[0x01, 0x02, 0x03], 3), 0x06);
        assert_eq!(checksum_byte_sum(&[0xFF, 0x02, 0x03], 2), 0x01);
        assert_eq!(checksum_byte_sum(&[0x10], 8), 0x10);
        assert_eq!(checksum_byte_sum(&[], 0), 0x00);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_append_verify_roundtrip(data in prop::collection::vec(any::<u8>(), 0..512)) {
                let mut buf = BytesMut::from(&data[..]);
                iso_sum_append(&mut buf, data.len(), 0).unwrap();
                prop_assert!(iso_sum_verify(&buf, data.len(), 0));
            }

            #[test]
            fn prop_single_bit_flip_detected(
                data in prop::collection::vec(any::<u8>(), 1..512),
                index_ratio in 0.0f64..1.0,
                bit in 0u32..8,
            ) {
                let mut buf = BytesMut::from(&data[..]);
                iso_sum_append(&mut buf, data.len(), 0).unwrap();

                let index = (data.len() as f64 * index_ratio) as usize;
                buf[index] ^= 1 << bit;
                prop_assert!(!iso_sum_verify(&buf, data.len(), 0));
            }
        }
    }
}
