//! Streaming frame decoder
//!
//! Pulls frames out of a caller-owned receive buffer that grows as bytes
//! arrive from the link.
//!
//! ```text
//!   SeekHeader ──(marker + 8 bytes)──▶ AwaitBody ──(frame_len bytes)──▶ validate
//!        ▲                                                                 │
//!        └──────────── emit frame / resync (drop byte or frame) ◀──────────┘
//! ```

use bytes::{Buf, BytesMut};
use tracing::{debug, trace};

use super::codec::validate_trailer;
use super::{
    Error, Frame, FrameConfig, FrameHeader, HEADER_SIZE, HexDisplay, Resync, Result, find_header,
};

/// Decoder position within the current candidate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Searching for the header marker
    SeekHeader,
    /// Header parsed, waiting for the rest of the frame
    AwaitBody {
        /// Parsed header of the candidate frame
        header: FrameHeader,
    },
}

/// Per-decoder counters
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames emitted
    pub frames: u64,
    /// Candidates rejected by the ISO-sum
    pub checksum_failures: u64,
    /// Candidates rejected by the tail marker
    pub tail_failures: u64,
    /// Headers announcing more payload than the configured maximum
    pub oversize_headers: u64,
    /// Bytes dropped while searching or resyncing
    pub discarded_bytes: u64,
}

/// Streaming frame decoder
///
/// Holds only the scan state; the receive buffer stays with the caller, who
/// appends incoming bytes and calls [`FrameDecoder::decode`] until it returns
/// `Ok(None)`.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    config: FrameConfig,
    state: DecodeState,
    stats: DecoderStats,
}

impl FrameDecoder {
    /// Create a decoder
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            state: DecodeState::SeekHeader,
            stats: DecoderStats::default(),
        }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Current scan state
    #[must_use]
    pub const fn state(&self) -> DecodeState {
        self.state
    }

    /// Counters since creation
    #[must_use]
    pub const fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Forget any partially parsed candidate
    pub fn reset(&mut self) {
        self.state = DecodeState::SeekHeader;
    }

    /// Try to take one frame from the front of `src`
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete, valid frame was consumed
    /// - `Ok(None)` if more bytes are needed
    /// - `Err(...)` if a candidate failed validation; the configured
    ///   [`Resync`] has already been applied, so calling again makes progress
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        loop {
            match self.state {
                DecodeState::SeekHeader => {
                    let before = src.len();
                    let found = find_header(src);
                    self.stats.discarded_bytes += (before - src.len()) as u64;

                    if found.is_none() || src.len() < HEADER_SIZE {
                        return Ok(None);
                    }

                    let header = FrameHeader::from_bytes(&src[..HEADER_SIZE])?;
                    if header.payload_len() > self.config.max_payload_len {
                        self.stats.oversize_headers += 1;
                        self.discard(src, 1);
                        debug!(
                            payload_len = header.payload_len(),
                            max = self.config.max_payload_len,
                            "header announces oversized payload; resyncing"
                        );
                        return Err(Error::PayloadTooLarge {
                            size: usize::from(header.payload_len()),
                            max: usize::from(self.config.max_payload_len),
                        });
                    }

                    trace!(
                        payload_len = header.payload_len(),
                        sender = %header.sender(),
                        receiver = %header.receiver(),
                        "frame header found"
                    );
                    self.state = DecodeState::AwaitBody { header };
                }
                DecodeState::AwaitBody { header } => {
                    let frame_len = header.frame_len();
                    if src.len() < frame_len {
                        return Ok(None);
                    }
                    self.state = DecodeState::SeekHeader;

                    if let Err(err) = validate_trailer(&src[..frame_len], &header, &self.config) {
                        match err {
                            Error::TailMismatch { .. } => self.stats.tail_failures += 1,
                            _ => self.stats.checksum_failures += 1,
                        }
                        let dropped = match self.config.resync {
                            Resync::DropByte => 1,
                            Resync::DropFrame => frame_len,
                        };
                        debug!(
                            error = %err,
                            dropped,
                            frame = %HexDisplay(&src[..frame_len]),
                            "frame failed validation; resyncing"
                        );
                        self.discard(src, dropped);
                        return Err(err);
                    }

                    let mut frame = src.split_to(frame_len).freeze();
                    trace!(frame = %HexDisplay(&frame), "frame decoded");
                    frame.truncate(frame_len - 2);
                    frame.advance(HEADER_SIZE);

                    self.stats.frames += 1;
                    return Ok(Some(Frame::from_parts(header, frame)));
                }
            }
        }
    }

    /// Take every complete frame from `src`, skipping candidates that fail validation
    pub fn decode_all(&mut self, src: &mut BytesMut) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            match self.decode(src) {
                Ok(Some(frame)) => frames.push(frame),
                Ok(None) => break,
                Err(err) => trace!(error = %err, "skipping invalid candidate"),
            }
        }
        frames
    }

    fn discard(&mut self, src: &mut BytesMut, count: usize) {
        let count = count.min(src.len());
        src.advance(count);
        self.stats.discarded_bytes += count as u64;
    }
}
