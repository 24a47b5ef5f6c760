//! In-memory transport for tests and replay.

use std::io;

use bytes::{Buf, BytesMut};

use super::Transport;

/// Buffers inbound bytes fed by the caller and records everything written.
///
/// `max_read` bounds how many bytes a single read hands out, which mimics a
/// serial driver delivering a frame across several reads.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: BytesMut,
    outbound: Vec<u8>,
    max_read: Option<usize>,
}

impl MemoryTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of bytes returned by each read; 0 is treated as 1.
    #[must_use]
    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read.max(1));
        self
    }

    /// Queue bytes to be returned by later reads.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.inbound.extend_from_slice(bytes);
    }

    /// Bytes queued but not yet read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Drain everything written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }
}

impl Transport for MemoryTransport {
    fn read(&mut self, dst: &mut BytesMut) -> io::Result<usize> {
        let count = self
            .max_read
            .map_or(self.inbound.len(), |max| max.min(self.inbound.len()));
        dst.extend_from_slice(&self.inbound[..count]);
        self.inbound.advance(count);
        Ok(count)
    }

    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        self.outbound.extend_from_slice(src);
        Ok(src.len())
    }
}
