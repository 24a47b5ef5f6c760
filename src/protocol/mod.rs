//! Link protocol core implementation
//!
//! This module provides the wire format, numeric and hex codecs, checksums,
//! and the streaming frame decoder.

mod checksum;
mod codec;
mod decoder;
mod error;
mod float;
mod frame;
mod header;
mod hex;
mod numeric;
mod types;

pub use checksum::{checksum_byte_sum, iso_sum, iso_sum_append, iso_sum_verify, iso_sums};
pub use codec::{decode_frame, encode_frame};
pub use decoder::{DecodeState, DecoderStats, FrameDecoder};
pub use error::{Error, Result};
pub use float::{FloatClass, classify_f32, classify_f64};
pub use frame::Frame;
pub use header::{FrameHeader, encode_header, find_header, find_tail};
pub use hex::{
    CRC16_INIT, CRC16_POLYNOMIAL, HexDecode, HexDisplay, MAX_HEX_TEXT_LEN, bytes_to_hex_text,
    crc16, crc16_append, crc16_check, text_field, text_to_bytes,
};
pub use numeric::{WireValue, decode, encode, encode_into};
pub use types::{Address, Endianness, FrameConfig, Resync, TrailerCheck};

/// Header marker opening every frame
pub const HEADER_MARKER: [u8; 2] = [0xAA, 0x63];

/// Tail marker closing a frame under [`TrailerCheck::TailMarker`]
pub const TAIL_MARKER: [u8; 2] = [0x09, 0xD7];

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Trailer size in bytes
pub const TRAILER_SIZE: usize = 2;

/// Minimum frame size (header + trailer)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;

/// Maximum payload size representable by the length field
pub const MAX_PAYLOAD_SIZE: u16 = u16::MAX;
