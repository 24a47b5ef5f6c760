//! Link frame

use bytes::Bytes;

use super::{Address, Error, FrameConfig, FrameHeader, MAX_PAYLOAD_SIZE, Result};

/// Link frame: header plus opaque payload
///
/// The trailer is not stored; it is produced by [`Frame::encode`] and checked
/// while decoding, according to the [`FrameConfig`] in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    payload: Bytes,
}

impl Frame {
    /// Create a new frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload does not fit the
    /// 16-bit length field.
    pub fn new(sender: Address, receiver: Address, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        let payload_len = u16::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge {
            size: payload.len(),
            max: usize::from(MAX_PAYLOAD_SIZE),
        })?;

        Ok(Self {
            header: FrameHeader::new(payload_len, sender, receiver),
            payload,
        })
    }

    pub(crate) fn from_parts(header: FrameHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Get sender address
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.header.sender()
    }

    /// Get receiver address
    #[must_use]
    pub const fn receiver(&self) -> Address {
        self.header.receiver()
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Total encoded length including trailer
    #[must_use]
    pub const fn wire_len(&self) -> usize {
        self.header.frame_len()
    }

    /// Encode frame to bytes
    pub fn encode(&self, config: &FrameConfig) -> Result<Vec<u8>> {
        super::encode_frame(self, config)
    }

    /// Decode a complete frame from the front of `bytes`
    pub fn decode(bytes: &[u8], config: &FrameConfig) -> Result<Self> {
        super::decode_frame(bytes, config)
    }
}
