//! Channel selectors for the 8-bit state mask

use crate::CaptureError;
use std::fmt;
use std::str::FromStr;

/// One of the eight logic inputs, each owning exactly one bit of the state mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Channel0 = 1,
    Channel1 = 2,
    Channel2 = 4,
    Channel3 = 8,
    Channel4 = 16,
    Channel5 = 32,
    Channel6 = 64,
    Channel7 = 128,
}

impl Channel {
    /// All channels in bit order
    pub const ALL: [Channel; 8] = [
        Channel::Channel0,
        Channel::Channel1,
        Channel::Channel2,
        Channel::Channel3,
        Channel::Channel4,
        Channel::Channel5,
        Channel::Channel6,
        Channel::Channel7,
    ];

    /// One-hot mask for this channel
    #[inline]
    pub fn mask(self) -> u8 {
        self as u8
    }

    /// Bit position (0-7)
    #[inline]
    pub fn index(self) -> usize {
        self.mask().trailing_zeros() as usize
    }
}

impl TryFrom<usize> for Channel {
    type Error = CaptureError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Channel::ALL
            .get(index)
            .copied()
            .ok_or(CaptureError::InvalidChannel(index))
    }
}

impl FromStr for Channel {
    type Err = CaptureError;

    /// Accepts `3`, `ch3` or `CH3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("ch")
            .or_else(|| trimmed.strip_prefix("CH"))
            .unwrap_or(trimmed);
        let index: usize = digits
            .parse()
            .map_err(|_| CaptureError::ParseChannel(s.to_string()))?;
        Channel::try_from(index)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CH{}", self.index())
    }
}
