//! Byte transport seam
//!
//! The codec never opens devices. A [`Transport`] is whatever moves raw bytes
//! for the link (a configured serial port, a socket, an in-memory buffer);
//! [`FrameLink`] pairs one with a [`FrameDecoder`](crate::protocol::FrameDecoder).

mod io;
mod link;
mod memory;

pub use io::IoTransport;
pub use link::FrameLink;
pub use memory::MemoryTransport;

use bytes::BytesMut;

/// Raw byte source and sink for a link
pub trait Transport {
    /// Append whatever bytes are available to `dst` without blocking
    ///
    /// Returns the number of bytes appended, possibly zero.
    fn read(&mut self, dst: &mut BytesMut) -> std::io::Result<usize>;

    /// Write bytes, returning how many were accepted
    fn write(&mut self, src: &[u8]) -> std::io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self, dst: &mut BytesMut) -> std::io::Result<usize> {
        (**self).read(dst)
    }

    fn write(&mut self, src: &[u8]) -> std::io::Result<usize> {
        (**self).write(src)
    }
}
