//! Numeric wire codec
//!
//! Converts integers and IEEE-754 floats to and from their wire bytes in a
//! caller-selected [`Endianness`]. Integers use the plain byte layout; the
//! float layout lives in [`float`](super::float).

use bytes::BytesMut;

use super::{Endianness, Error, Result};

/// A value with a fixed-width wire representation
pub trait WireValue: Sized + Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Append the encoded bytes to `dst`
    fn encode_wire(self, endian: Endianness, dst: &mut BytesMut);

    /// Decode from the first [`Self::WIDTH`] bytes of `src`
    ///
    /// Returns `None` if `src` is shorter than [`Self::WIDTH`].
    fn decode_wire(src: &[u8], endian: Endianness) -> Option<Self>;
}

macro_rules! impl_wire_int {
    ($($ty:ty),* $(,)?) => {$(
        impl WireValue for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn encode_wire(self, endian: Endianness, dst: &mut BytesMut) {
                match endian {
                    Endianness::Big => dst.extend_from_slice(&self.to_be_bytes()),
                    Endianness::Little => dst.extend_from_slice(&self.to_le_bytes()),
                }
            }

            #[inline]
            fn decode_wire(src: &[u8], endian: Endianness) -> Option<Self> {
                let raw: [u8; std::mem::size_of::<$ty>()] = src.get(..Self::WIDTH)?.try_into().ok()?;
                Some(match endian {
                    Endianness::Big => <$ty>::from_be_bytes(raw),
                    Endianness::Little => <$ty>::from_le_bytes(raw),
                })
            }
        }
    )*};
}

impl_wire_int!(i16, u16, i32, u32, i64, u64);

/// Encode a value to a fresh byte vector
#[must_use]
pub fn encode<T: WireValue>(value: T, endian: Endianness) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(T::WIDTH);
    value.encode_wire(endian, &mut out);
    out.to_vec()
}

/// Append the encoded value to `dst`
#[inline]
pub fn encode_into<T: WireValue>(value: T, endian: Endianness, dst: &mut BytesMut) {
    value.encode_wire(endian, dst);
}

/// Decode a value starting at `offset`
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] if fewer than `T::WIDTH` bytes remain
/// after `offset`.
pub fn decode<T: WireValue>(bytes: &[u8], offset: usize, endian: Endianness) -> Result<T> {
    bytes
        .get(offset..)
        .and_then(|src| T::decode_wire(src, endian))
        .ok_or(Error::BufferTooSmall {
            needed: offset.saturating_add(T::WIDTH),
            got: bytes.len(),
        })
}
