//! Link codec error types

use thiserror::Error;

/// Link codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// Frame does not start with the header marker
    #[error("invalid header marker: expected 0xAA63, got {found:02X?}")]
    InvalidMarker {
        /// First two bytes of the candidate frame
        found: [u8; 2],
    },

    /// ISO-sum trailer does not match the frame contents
    #[error("checksum mismatch: expected {expected:02X?}, got {found:02X?}")]
    ChecksumMismatch {
        /// Trailer recomputed from the frame
        expected: [u8; 2],
        /// Trailer carried by the frame
        found: [u8; 2],
    },

    /// Tail marker missing at the end of the frame
    #[error("tail marker mismatch: expected 0x09D7, got {found:02X?}")]
    TailMismatch {
        /// Last two bytes of the candidate frame
        found: [u8; 2],
    },

    /// Payload too large
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error is an integrity failure the caller can recover from by resyncing
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. } | Self::TailMismatch { .. } | Self::InvalidMarker { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
