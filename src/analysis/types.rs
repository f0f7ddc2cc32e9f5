//! Common analysis result types

use crate::capture::Channel;
use crate::{CaptureError, Result};

/// A level change on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Tick at which the new level was observed
    pub timestamp: u64,
    /// true for low→high, false for high→low
    pub rising: bool,
}

/// Toggle frequency statistics for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleFrequency {
    /// Mean of per-period frequencies in Hz
    pub mean: f64,
    /// Population standard deviation of per-period frequencies in Hz
    pub stddev: f64,
    /// Number of periods measured (transitions - 1)
    pub samples: usize,
}

impl ToggleFrequency {
    /// True when the mean lies strictly within `target ± tolerance` and the spread
    /// is below `tolerance`
    pub fn within(&self, target: f64, tolerance: f64) -> bool {
        (self.mean - target).abs() < tolerance && self.stddev < tolerance
    }
}

/// Both metrics for one channel, computed in a single pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReport {
    pub channel: Channel,
    /// Fraction of the configured window spent high (not clamped)
    pub active_ratio: f64,
    /// Transitions seen, excluding the initial marker
    pub transitions: usize,
    /// `None` when fewer than two transitions were seen or a period was invalid
    pub toggle: Option<ToggleFrequency>,
    /// First `(previous, current)` edge pair whose timestamps did not advance
    pub invalid_period: Option<(u64, u64)>,
}

impl ChannelReport {
    /// Toggle statistics, `InvalidPeriod` if two edges shared a tick (or went
    /// backwards), or `InsufficientData` if the channel barely moved
    pub fn toggle_frequency(&self) -> Result<ToggleFrequency> {
        if let Some((start, end)) = self.invalid_period {
            return Err(CaptureError::InvalidPeriod { start, end });
        }
        self.toggle.ok_or(CaptureError::InsufficientData {
            transitions: self.transitions,
        })
    }

    /// Active ratio as a percentage
    pub fn active_percent(&self) -> f64 {
        self.active_ratio * 100.0
    }
}
