//! Frame-level facade over a byte transport.

use std::io;

use bytes::BytesMut;
use tracing::{debug, instrument, trace};

use super::Transport;
use crate::protocol::{
    DecoderStats, Frame, FrameConfig, FrameDecoder, HexDisplay, Result, encode_frame,
};

/// Initial receive buffer capacity.
const RX_CAPACITY: usize = 4 * 1024;

/// Couples a [`Transport`] with a receive buffer and a [`FrameDecoder`].
///
/// The caller drives the link: [`FrameLink::poll`] performs one non-blocking
/// read and returns the frames completed by it.
#[derive(Debug)]
pub struct FrameLink<T> {
    transport: T,
    config: FrameConfig,
    decoder: FrameDecoder,
    rx: BytesMut,
}

impl<T: Transport> FrameLink<T> {
    /// Create a link over `transport`.
    pub fn new(transport: T, config: FrameConfig) -> Self {
        Self {
            transport,
            config,
            decoder: FrameDecoder::new(config),
            rx: BytesMut::with_capacity(RX_CAPACITY),
        }
    }

    /// Encode and write a frame, returning the number of bytes written.
    ///
    /// Short writes are retried; a transport that accepts nothing fails with
    /// [`io::ErrorKind::WriteZero`].
    #[instrument(level = "trace", skip_all, fields(len = frame.payload().len()))]
    pub fn send(&mut self, frame: &Frame) -> Result<usize> {
        let bytes = encode_frame(frame, &self.config)?;
        trace!(frame = %HexDisplay(&bytes), "sending frame");

        let mut written = 0;
        while written < bytes.len() {
            let count = self.transport.write(&bytes[written..])?;
            if count == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero).into());
            }
            written += count;
        }
        Ok(written)
    }

    /// Read once from the transport and return every frame completed so far.
    ///
    /// Candidates that fail validation are dropped per the configured resync policy.
    #[instrument(level = "trace", skip_all)]
    pub fn poll(&mut self) -> Result<Vec<Frame>> {
        let count = self.transport.read(&mut self.rx)?;
        if count > 0 {
            trace!(count, buffered = self.rx.len(), "bytes received");
        }

        let frames = self.decoder.decode_all(&mut self.rx);
        if !frames.is_empty() {
            debug!(frames = frames.len(), "frames decoded");
        }
        Ok(frames)
    }

    /// Bytes buffered but not yet part of a frame.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.rx.len()
    }

    /// Decoder counters.
    #[must_use]
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Access the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably access the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drop buffered bytes and any partially parsed frame.
    pub fn clear(&mut self) {
        self.rx.clear();
        self.decoder.reset();
    }

    /// Unwrap the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
