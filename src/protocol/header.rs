//! Frame header and boundary scanning
//!
//! The header is 8 bytes and precedes every frame.

use bytes::{Buf, BytesMut};
use tracing::trace;

use super::{
    Address, Endianness, Error, HEADER_MARKER, HEADER_SIZE, Result, TAIL_MARKER, TRAILER_SIZE,
    decode, encode_into,
};

/// Frame header
///
/// # Wire Format
///
/// ```text
/// 0       1       2       3       4       5       6       7
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// |  0xAA |  0x63 |  Length (LE)  | S.grp | S.id  | R.grp | R.id  |
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// ```
///
/// `Length` counts payload bytes only; the two trailer bytes follow the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    payload_len: u16,
    sender: Address,
    receiver: Address,
}

impl FrameHeader {
    /// Create a new frame header
    #[must_use]
    pub const fn new(payload_len: u16, sender: Address, receiver: Address) -> Self {
        Self {
            payload_len,
            sender,
            receiver,
        }
    }

    /// Get payload length
    #[must_use]
    pub const fn payload_len(&self) -> u16 {
        self.payload_len
    }

    /// Get sender address
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Get receiver address
    #[must_use]
    pub const fn receiver(&self) -> Address {
        self.receiver
    }

    /// Total frame length: header, payload, and trailer
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        HEADER_SIZE + self.payload_len as usize + TRAILER_SIZE
    }

    /// Append the encoded header to `dst`
    pub fn encode_into(&self, dst: &mut BytesMut) {
        encode_header(
            self.payload_len,
            self.sender.group,
            self.sender.id,
            self.receiver.group,
            self.receiver.id,
            dst,
        );
    }

    /// Convert to bytes
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        self.encode_into(&mut buf);

        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&buf);
        bytes
    }

    /// Parse from bytes
    ///
    /// Only the first [`HEADER_SIZE`] bytes are read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        if bytes[..2] != HEADER_MARKER {
            return Err(Error::InvalidMarker {
                found: [bytes[0], bytes[1]],
            });
        }

        Ok(Self {
            payload_len: decode(bytes, 2, Endianness::Little)?,
            sender: Address::new(bytes[4], bytes[5]),
            receiver: Address::new(bytes[6], bytes[7]),
        })
    }
}

/// Append a frame header: marker, little-endian length, then the four address bytes
pub fn encode_header(
    payload_len: u16,
    sender_group: u8,
    sender_id: u8,
    receiver_group: u8,
    receiver_id: u8,
    dst: &mut BytesMut,
) {
    dst.reserve(HEADER_SIZE);
    dst.extend_from_slice(&HEADER_MARKER);
    encode_into(payload_len, Endianness::Little, dst);
    dst.extend_from_slice(&[sender_group, sender_id, receiver_group, receiver_id]);
}

/// Scan for the header marker, consuming every byte in front of it
///
/// Returns `Some(0)` once the marker sits at the front of the buffer with at
/// least one byte after it. Returns `None` once fewer than 3 bytes remain; in
/// that case the last two bytes are kept since they may start a marker. A
/// buffer already shorter than 3 bytes is left untouched.
pub fn find_header(buffer: &mut BytesMut) -> Option<usize> {
    if buffer.len() <= HEADER_MARKER.len() {
        return None;
    }

    let limit = buffer.len() - HEADER_MARKER.len();
    let found = (0..limit).find(|&offset| buffer[offset..offset + 2] == HEADER_MARKER);
    let skip = found.unwrap_or(limit);

    if skip > 0 {
        trace!(discarded = skip, "skipping bytes ahead of header marker");
        buffer.advance(skip);
    }

    found.map(|_| 0)
}

/// Offset of the tail marker of a `frame_len`-byte frame at the front of `buffer`
///
/// Returns `Some(frame_len - 2)` if the two bytes ending the frame are
/// `0x09 0xD7`, `None` if they differ or `frame_len` runs past the buffer.
#[must_use]
pub fn find_tail(buffer: &[u8], frame_len: usize) -> Option<usize> {
    let offset = frame_len.checked_sub(TAIL_MARKER.len())?;
    let tail = buffer.get(offset..frame_len)?;
    (tail == TAIL_MARKER).then_some(offset)
}
