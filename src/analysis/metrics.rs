//! Edge accumulators for the two timing metrics

use super::config::AnalyzerConfig;
use super::stats::RunningStats;
use super::types::{Edge, ToggleFrequency};
use crate::{CaptureError, Result};
use tracing::debug;

/// Sums high intervals closed by a falling edge
///
/// An interval still open when the capture ends is not counted. A falling edge
/// with no open interval (the channel started high) is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveTime {
    open_since: Option<u64>,
    high_ticks: u64,
    intervals: usize,
}

impl ActiveTime {
    pub fn push(&mut self, edge: Edge) -> Result<()> {
        if edge.rising {
            self.open_since = Some(edge.timestamp);
            return Ok(());
        }

        let Some(start) = self.open_since.take() else {
            debug!("Falling edge at t={} with no open interval", edge.timestamp);
            return Ok(());
        };

        let ticks = edge
            .timestamp
            .checked_sub(start)
            .ok_or(CaptureError::InvalidPeriod {
                start,
                end: edge.timestamp,
            })?;
        self.high_ticks = self.high_ticks.saturating_add(ticks);
        self.intervals += 1;
        Ok(())
    }

    /// Total ticks spent high across closed intervals
    pub fn high_ticks(&self) -> u64 {
        self.high_ticks
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// High time over the configured window. Zero when no interval closed.
    pub fn ratio(&self, config: &AnalyzerConfig) -> f64 {
        config.ticks_to_seconds(self.high_ticks) / config.capture_seconds()
    }
}

/// Collects one frequency sample per period between consecutive edges
///
/// The first edge only seeds the reference timestamp. An edge that does not
/// advance past the previous one marks the statistics invalid; later edges are
/// still counted but no longer measured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TogglePeriods {
    prev_timestamp: Option<u64>,
    transitions: usize,
    stats: RunningStats,
    invalid_period: Option<(u64, u64)>,
}

impl TogglePeriods {
    pub fn push(&mut self, edge: Edge, config: &AnalyzerConfig) {
        self.transitions += 1;
        if self.invalid_period.is_some() {
            return;
        }

        if let Some(prev) = self.prev_timestamp {
            if edge.timestamp <= prev {
                debug!(
                    "Edge at t={} does not follow t={}, toggle statistics invalid",
                    edge.timestamp, prev
                );
                self.invalid_period = Some((prev, edge.timestamp));
                return;
            }
            let period = edge.timestamp - prev;
            self.stats.push(config.sample_rate() as f64 / period as f64);
        }
        self.prev_timestamp = Some(edge.timestamp);
    }

    /// Edges seen so far
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// First `(previous, current)` timestamp pair that failed to advance
    pub fn invalid_period(&self) -> Option<(u64, u64)> {
        self.invalid_period
    }

    /// Mean and population stddev, or `None` with fewer than two edges or after
    /// an invalid period
    pub fn frequency(&self) -> Option<ToggleFrequency> {
        if self.invalid_period.is_some() {
            return None;
        }
        Some(ToggleFrequency {
            mean: self.stats.mean()?,
            stddev: self.stats.stddev()?,
            samples: self.stats.count(),
        })
    }
}
