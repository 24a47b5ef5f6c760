//! Hex text transcoding and CRC-16
//!
//! Used for diagnostics: rendering raw frames in logs and parsing frames typed
//! in by an operator. Frame validation itself lives in [`checksum`](super::checksum).

use std::fmt::{self, Write as _};

use bytes::BytesMut;
use tracing::trace;

/// Maximum number of input bytes considered by [`text_to_bytes`]
pub const MAX_HEX_TEXT_LEN: usize = 1024;

/// Reflected CRC-16 polynomial
pub const CRC16_POLYNOMIAL: u16 = 0xA001;

/// CRC-16 initial register value
pub const CRC16_INIT: u16 = 0xFFFF;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Result of parsing hex text
///
/// Parsing never fails outright: it stops at the first bad pair and keeps
/// what it decoded up to that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexDecode {
    /// Bytes decoded before parsing stopped
    pub bytes: Vec<u8>,
    /// Byte offset into the input of the pair that stopped parsing
    pub stopped_at: Option<usize>,
    /// Input was longer than [`MAX_HEX_TEXT_LEN`] and the tail was ignored
    pub truncated: bool,
}

impl HexDecode {
    /// Number of decoded bytes
    #[must_use]
    pub fn count(&self) -> usize {
        self.bytes.len()
    }

    /// Whether every considered character was consumed
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stopped_at.is_none()
    }
}

/// Parse two-digit hex pairs, optionally separated by spaces
///
/// Digits are case-insensitive. A pair holding a non-hex character, or a high
/// digit with no low digit after it, ends parsing. Only the first
/// [`MAX_HEX_TEXT_LEN`] bytes of the UTF-8 input are considered and a pair
/// must fit inside them. Offsets are byte offsets, so a multi-byte character
/// stops parsing at its first byte.
#[must_use]
pub fn text_to_bytes(text: &str) -> HexDecode {
    let input = text.as_bytes();
    let limit = input.len().min(MAX_HEX_TEXT_LEN);
    let mut decoded = HexDecode {
        bytes: Vec::with_capacity(limit / 2),
        stopped_at: None,
        truncated: input.len() > MAX_HEX_TEXT_LEN,
    };

    let mut i = 0;
    while i < limit {
        let high = input[i];
        if high == b' ' {
            i += 1;
            continue;
        }

        let low = input[..limit].get(i + 1).copied();
        match (hex_value(high), low.and_then(hex_value)) {
            (Some(high), Some(low)) => decoded.bytes.push((high << 4) | low),
            _ => {
                trace!(position = i, "hex text stopped at invalid pair");
                decoded.stopped_at = Some(i);
                break;
            }
        }
        i += 2;
    }

    decoded
}

#[allow(clippy::cast_possible_truncation)]
fn hex_value(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}

/// Render the first `count` bytes as uppercase hex pairs
///
/// `count` is clamped to the slice length.
#[must_use]
pub fn bytes_to_hex_text(bytes: &[u8], count: usize, spaced: bool) -> String {
    let bytes = &bytes[..count.min(bytes.len())];
    let mut text = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if spaced && i > 0 {
            text.push(' ');
        }
        text.push(char::from(HEX_UPPER[usize::from(byte >> 4)]));
        text.push(char::from(HEX_UPPER[usize::from(byte & 0x0F)]));
    }
    text
}

/// Lazily formatted spaced hex view, for log fields
///
/// ```
/// use uavlink::protocol::HexDisplay;
///
/// assert_eq!(HexDisplay(&[0xAA, 0x63]).to_string(), "AA 63");
/// ```
#[derive(Clone, Copy)]
pub struct HexDisplay<'a>(pub &'a [u8]);

impl fmt::Display for HexDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for HexDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{self}]")
    }
}

/// CRC-16 with polynomial `0xA001`, initial register `0xFFFF`
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC16_INIT;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC16_POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Append the CRC-16 of `buffer` to it, low byte first
///
/// Returns `false` without touching the buffer if it is empty.
pub fn crc16_append(buffer: &mut BytesMut) -> bool {
    if buffer.is_empty() {
        return false;
    }

    let crc = crc16(&buffer[..]);
    buffer.extend_from_slice(&crc.to_le_bytes());
    true
}

/// Check a buffer whose last two bytes are its CRC-16, low byte first
#[must_use]
pub fn crc16_check(data: &[u8]) -> bool {
    match data.len().checked_sub(2) {
        Some(body) if body > 0 => {
            crc16(&data[..body]) == u16::from_le_bytes([data[body], data[body + 1]])
        }
        _ => false,
    }
}

/// Extract `len` bytes from `start` as text, replacing invalid UTF-8
///
/// Returns `None` if the range is out of bounds.
#[must_use]
pub fn text_field(bytes: &[u8], start: usize, len: usize) -> Option<String> {
    let end = start.checked_add(len)?;
    bytes
        .get(start..end)
        .map(|field| String::from_utf8_lossy(field).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_bytes_spaced_and_contiguous() {
        let spaced = text_to_bytes("AA 63");
        assert_eq!(spaced.bytes, [0xAA, 0x63]);
        assert!(spaced.is_complete());

        let contiguous = text_to_bytes("aa63 0102");
        assert_eq!(contiguous.bytes, [0xAA, 0x63, 0x01, 0x02]);
        assert_eq!(contiguous.count(), 4);
    }

    #[test]
    fn test_text_to_bytes_stops_at_invalid_pair() {
        let decoded = text_to_bytes("AA G3");
        assert_eq!(decoded.bytes, [0xAA]);
        assert_eq!(decoded.count(), 1);
        assert_eq!(decoded.stopped_at, Some(3));
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_text_to_bytes_offsets_are_bytes() {
        // 'µ' is two bytes in UTF-8
        let decoded = text_to_bytes("µ AA");
        assert!(decoded.bytes.is_empty());
        assert_eq!(decoded.stopped_at, Some(0));

        let decoded = text_to_bytes("AA µ");
        assert_eq!(decoded.bytes, [0xAA]);
        assert_eq!(decoded.stopped_at, Some(3));

        let long = "µ".repeat(MAX_HEX_TEXT_LEN / 2 + 1);
        assert!(text_to_bytes(&long).truncated);
    }

    #[test]
    fn test_text_to_bytes_dangling_digit() {
        let decoded = text_to_bytes("AA 6");
        assert_eq!(decoded.bytes, [0xAA]);
        assert_eq!(decoded.stopped_at, Some(3));

        // a space splitting a pair is not a digit
        let decoded = text_to_bytes("A A");
        assert!(decoded.bytes.is_empty());
        assert_eq!(decoded.stopped_at, Some(0));
    }

    #[test]
    fn test_text_to_bytes_length_cap() {
        let text = "00".repeat(600);
        let decoded = text_to_bytes(&text);
        assert_eq!(decoded.count(), MAX_HEX_TEXT_LEN / 2);
        assert!(decoded.truncated);
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_bytes_to_hex_text() {
        assert_eq!(bytes_to_hex_text(&[0xAA, 0x63], 2, true), "AA 63");
        assert_eq!(bytes_to_hex_text(&[0xAA, 0x63], 2, false), "AA63");
        assert_eq!(bytes_to_hex_text(&[0x0F, 0xA0, 0x01], 2, true), "0F A0");
        assert_eq!(bytes_to_hex_text(&[0x0F], 5, true), "0F");
        assert_eq!(bytes_to_hex_text(&[], 0, true), "");
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(HexDisplay(&[0x09, 0xD7]).to_string(), "09 D7");
        assert_eq!(format!("{:?}", HexDisplay(&[0x01])), "[01]");
    }

    #[test]
    fn test_crc16_golden_vector() {
        assert_eq!(crc16(&[0x01, 0x02, 0x03]), 0x6161);

        let mut buf = BytesMut::from(&[0x01, 0x02, 0x03][..]);
        assert!(crc16_append(&mut buf));
        assert_eq!(buf.as_ref(), &[0x01, 0x02, 0x03, 0x61, 0x61]);
        assert!(crc16_check(&buf));
    }

    #[test]
    fn test_crc16_append_empty_is_noop() {
        let mut buf = BytesMut::new();
        assert!(!crc16_append(&mut buf));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_crc16_check_detects_corruption() {
        let mut buf = BytesMut::from(&[0xAA, 0x63, 0x04, 0x00][..]);
        crc16_append(&mut buf);
        buf[2] ^= 0x01;
        assert!(!crc16_check(&buf));
        assert!(!crc16_check(&[0x61, 0x61]));
    }

    #[test]
    fn test_text_field() {
        let payload = b"\x01GPS1\x02";
        assert_eq!(text_field(payload, 1, 4).as_deref(), Some("GPS1"));
        assert_eq!(text_field(payload, 4, 10), None);
        assert_eq!(text_field(payload, usize::MAX, 2), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_hex_text_roundtrip(
                data in prop::collection::vec(any::<u8>(), 0..400),
                spaced in any::<bool>(),
            ) {
                let text = bytes_to_hex_text(&data, data.len(), spaced);
                let decoded = text_to_bytes(&text);
                let expected = if spaced { data.len().min(341) } else { data.len().min(512) };
                prop_assert_eq!(&decoded.bytes[..], &data[..expected]);
            }
        }
    }
}
