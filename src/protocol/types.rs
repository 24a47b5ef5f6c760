//! Link codec value types and configuration

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Byte order applied to a value's encoded bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Endianness {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    #[default]
    Little,
}

impl Endianness {
    /// Check for big endian
    #[must_use]
    pub const fn is_big(self) -> bool {
        matches!(self, Self::Big)
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => write!(f, "big-endian"),
            Self::Little => write!(f, "little-endian"),
        }
    }
}

/// Node address on the link (cluster group + node id)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Address {
    /// Cluster group
    pub group: u8,
    /// Node id within the group
    pub id: u8,
}

impl Address {
    /// Create a new address
    #[must_use]
    pub const fn new(group: u8, id: u8) -> Self {
        Self { group, id }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.id)
    }
}

/// How the two trailer bytes of a frame are produced and validated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrailerCheck {
    /// Dual running-sum checksum over the checksum region
    #[default]
    IsoSum,
    /// Fixed `0x09 0xD7` tail marker
    TailMarker,
}

impl fmt::Display for TrailerCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsoSum => write!(f, "iso-sum"),
            Self::TailMarker => write!(f, "tail-marker"),
        }
    }
}

/// Recovery applied when a candidate frame fails validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Resync {
    /// Drop the first byte of the candidate and search for the next marker
    #[default]
    DropByte,
    /// Discard every byte of the candidate frame
    DropFrame,
}

/// Frame codec configuration
///
/// Constructed by the caller and handed to each [`FrameDecoder`](super::FrameDecoder)
/// or [`Frame::encode`](super::Frame::encode) call. There is no shared default instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameConfig {
    /// Trailer strategy
    pub trailer: TrailerCheck,
    /// Recovery policy for frames that fail validation
    pub resync: Resync,
    /// Offset of the first byte covered by the ISO-sum
    pub checksum_start: usize,
    /// Largest accepted payload length
    pub max_payload_len: u16,
}

impl FrameConfig {
    /// Create a configuration with the given trailer strategy
    #[must_use]
    pub fn new(trailer: TrailerCheck) -> Self {
        Self {
            trailer,
            ..Self::default()
        }
    }

    /// Set the resync policy
    #[must_use]
    pub const fn with_resync(mut self, resync: Resync) -> Self {
        self.resync = resync;
        self
    }

    /// Set the ISO-sum start offset
    ///
    /// Offsets below the end of the header make the checksum cover header bytes too.
    #[must_use]
    pub const fn with_checksum_start(mut self, offset: usize) -> Self {
        self.checksum_start = offset;
        self
    }

    /// Set the maximum accepted payload length
    #[must_use]
    pub const fn with_max_payload_len(mut self, max: u16) -> Self {
        self.max_payload_len = max;
        self
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            trailer: TrailerCheck::IsoSum,
            resync: Resync::DropByte,
            checksum_start: HEADER_SIZE,
            max_payload_len: MAX_PAYLOAD_SIZE,
        }
    }
}
