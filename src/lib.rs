//! uavlink - Link-layer codec for UAV serial telemetry
//!
//! This library turns typed values into wire bytes and back, frames payloads
//! with an addressed header and a checked trailer, and recovers frames from a
//! noisy byte stream.
//!
//! # Quick Start
//!
//! ```rust
//! use uavlink::{Address, Frame, FrameConfig, FrameDecoder};
//! use bytes::BytesMut;
//!
//! let config = FrameConfig::default();
//! let frame = Frame::new(Address::new(1, 0), Address::new(2, 0), &b"attitude"[..])?;
//!
//! // Encode with header and ISO-sum trailer
//! let bytes = frame.encode(&config)?;
//!
//! // Recover it from a stream with leading noise
//! let mut rx = BytesMut::from(&[0x00, 0x42][..]);
//! rx.extend_from_slice(&bytes);
//! let mut decoder = FrameDecoder::new(config);
//! let decoded = decoder.decode(&mut rx)?;
//! assert_eq!(decoded, Some(frame));
//! # Ok::<(), uavlink::Error>(())
//! ```
//!
//! # Features
//!
//! - **Numeric codec** - integers and IEEE-754 floats in either byte order
//! - **Hex text** - diagnostic rendering and parsing plus CRC-16
//! - **Framing** - `AA 63` header, ISO-sum or tail-marker trailer
//! - **Streaming** - resynchronising decoder over any byte [`transport::Transport`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    Address, Endianness, Error, Frame, FrameConfig, FrameDecoder, FrameHeader, HEADER_MARKER,
    HEADER_SIZE, MAX_PAYLOAD_SIZE, Resync, Result, TAIL_MARKER, TrailerCheck,
};
pub use transport::{FrameLink, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
