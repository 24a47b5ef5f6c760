//! Frame codec (encode/decode)
//!
//! Whole-frame encoding and decoding of a single, complete frame. Streaming
//! input goes through [`FrameDecoder`](super::FrameDecoder), which shares the
//! trailer validation below.

use bytes::{Bytes, BytesMut};

use super::{
    Error, Frame, FrameConfig, FrameHeader, HEADER_SIZE, Result, TAIL_MARKER, TrailerCheck,
    find_tail, iso_sum, iso_sum_append, iso_sum_verify,
};

/// Region `(start, len)` covered by the ISO-sum for a payload of `payload_len`
///
/// A start at or past the end of the payload gives an empty region ending at
/// the trailer, whose ISO-sum is `FF FF`.
fn checksum_region(config: &FrameConfig, payload_len: usize) -> (usize, usize) {
    let end = HEADER_SIZE + payload_len;
    let start = config.checksum_start.min(end);
    (start, end - start)
}

/// Encode a frame to bytes
///
/// # Format
///
/// ```text
/// [HEADER (8 bytes)] [PAYLOAD (length bytes)] [TRAILER (2 bytes)]
/// ```
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the payload is longer than
/// `config.max_payload_len`.
pub fn encode_frame(frame: &Frame, config: &FrameConfig) -> Result<Vec<u8>> {
    let header = frame.header();
    let payload = frame.payload();

    if header.payload_len() > config.max_payload_len {
        return Err(Error::PayloadTooLarge {
            size: payload.len(),
            max: usize::from(config.max_payload_len),
        });
    }

    let mut bytes = BytesMut::with_capacity(header.frame_len());
    header.encode_into(&mut bytes);
    bytes.extend_from_slice(payload);

    match config.trailer {
        TrailerCheck::IsoSum => {
            let (start, len) = checksum_region(config, payload.len());
            iso_sum_append(&mut bytes, len, start)?;
        }
        TrailerCheck::TailMarker => bytes.extend_from_slice(&TAIL_MARKER),
    }

    Ok(bytes.to_vec())
}

/// Check the trailer of a complete frame
pub(crate) fn validate_trailer(
    frame: &[u8],
    header: &FrameHeader,
    config: &FrameConfig,
) -> Result<()> {
    let frame_len = header.frame_len();
    let found = [frame[frame_len - 2], frame[frame_len - 1]];

    match config.trailer {
        TrailerCheck::IsoSum => {
            let (start, len) = checksum_region(config, usize::from(header.payload_len()));
            if iso_sum_verify(frame, len, start) {
                Ok(())
            } else {
                Err(Error::ChecksumMismatch {
                    expected: iso_sum(&frame[start..start + len]),
                    found,
                })
            }
        }
        TrailerCheck::TailMarker => find_tail(frame, frame_len)
            .map(|_| ())
            .ok_or(Error::TailMismatch { found }),
    }
}

/// Decode a frame from the front of `bytes`
///
/// Bytes after the frame are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than the frame it announces
/// - Header marker is invalid
/// - Payload is longer than `config.max_payload_len`
/// - Trailer fails validation
pub fn decode_frame(bytes: &[u8], config: &FrameConfig) -> Result<Frame> {
    let header = FrameHeader::from_bytes(bytes)?;

    if header.payload_len() > config.max_payload_len {
        return Err(Error::PayloadTooLarge {
            size: usize::from(header.payload_len()),
            max: usize::from(config.max_payload_len),
        });
    }

    let frame_len = header.frame_len();
    if bytes.len() < frame_len {
        return Err(Error::BufferTooSmall {
            needed: frame_len,
            got: bytes.len(),
        });
    }

    validate_trailer(&bytes[..frame_len], &header, config)?;

    let payload = Bytes::copy_from_slice(&bytes[HEADER_SIZE..frame_len - 2]);
    Ok(Frame::from_parts(header, payload))
}
