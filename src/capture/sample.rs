//! Core data types for decoded captures

use super::channel::Channel;
use std::fmt;

/// Size in bytes of one on-disk record: 8-byte LE timestamp + 1-byte state mask
pub const RECORD_SIZE: usize = 9;

/// One observation of all eight channels at a tick
///
/// Captures are change-driven: a Sample is emitted whenever any channel changes,
/// so the levels in `channel_state` hold until the next Sample's timestamp.
///
/// A Sample with `timestamp == 0` is the capture device's initial marker. It
/// records the starting levels before real ticking begins and is never a
/// transition on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample {
    /// Ticks since capture start
    pub timestamp: u64,
    /// Bit N is the logic level of channel N
    pub channel_state: u8,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp: u64, channel_state: u8) -> Self {
        Self {
            timestamp,
            channel_state,
        }
    }

    /// Logic level of `channel` in this sample
    #[inline]
    pub fn level(&self, channel: Channel) -> bool {
        self.channel_state & channel.mask() != 0
    }

    /// Whether this is the timestamp-0 initial marker
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.timestamp == 0
    }

    /// Decode one record. `bytes` must be exactly [`RECORD_SIZE`] long.
    #[inline]
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut timestamp = [0u8; 8];
        timestamp.copy_from_slice(&bytes[..8]);
        Self {
            timestamp: u64::from_le_bytes(timestamp),
            channel_state: bytes[8],
        }
    }

    /// Encode this sample in the on-disk record layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        record[..8].copy_from_slice(&self.timestamp.to_le_bytes());
        record[8] = self.channel_state;
        record
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Sample[t={}, state={:#010b}]",
            self.timestamp, self.channel_state
        )
    }
}

/// Encode a run of samples into a flat capture file image
pub fn encode_records(samples: &[Sample]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * RECORD_SIZE);
    for sample in samples {
        out.extend_from_slice(&sample.to_bytes());
    }
    out
}
