//! Adapter for `std::io` byte streams.

use std::io::{self, Read, Write};

use bytes::BytesMut;

use super::Transport;

/// Default size of a single read.
const DEFAULT_READ_CHUNK: usize = 1024;

/// Wraps any `Read + Write` stream, e.g. a serial device opened and
/// configured in non-blocking mode by the caller.
#[derive(Debug)]
pub struct IoTransport<S> {
    stream: S,
    read_chunk: usize,
}

impl<S: Read + Write> IoTransport<S> {
    /// Wrap a stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }

    /// Set the maximum number of bytes taken per read; 0 is treated as 1.
    #[must_use]
    pub fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk.max(1);
        self
    }

    /// Access the wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for IoTransport<S> {
    fn read(&mut self, dst: &mut BytesMut) -> io::Result<usize> {
        let start = dst.len();
        dst.resize(start + self.read_chunk, 0);

        let result = loop {
            match self.stream.read(&mut dst[start..]) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break Ok(0),
                other => break other,
            }
        };

        dst.truncate(start + *result.as_ref().unwrap_or(&0));
        result
    }

    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        match self.stream.write(src) {
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(0),
            other => other,
        }
    }
}
