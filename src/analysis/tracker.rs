//! Single-pass per-channel state for both metrics

use super::config::AnalyzerConfig;
use super::metrics::{ActiveTime, TogglePeriods};
use super::transitions::EdgeDetector;
use super::types::ChannelReport;
use crate::Result;
use crate::capture::{Channel, Sample};
use tracing::debug;

/// Feeds one channel's edges into both metric accumulators
///
/// Several trackers can consume the same sample stream, which lets a streaming
/// reader compute every channel's report without buffering the capture.
#[derive(Debug, Clone)]
pub struct ChannelTracker {
    config: AnalyzerConfig,
    detector: EdgeDetector,
    active: ActiveTime,
    periods: TogglePeriods,
}

impl ChannelTracker {
    pub fn new(config: AnalyzerConfig, channel: Channel) -> Self {
        Self {
            config,
            detector: EdgeDetector::new(channel),
            active: ActiveTime::default(),
            periods: TogglePeriods::default(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.detector.channel()
    }

    /// Process the next sample in capture order
    ///
    /// Only a high interval that ends before it starts is an error here. Edges
    /// sharing a tick are recorded in the report's toggle statistics instead.
    pub fn push(&mut self, sample: &Sample) -> Result<()> {
        if let Some(edge) = self.detector.update(sample) {
            self.active.push(edge)?;
            self.periods.push(edge, &self.config);
        }
        Ok(())
    }

    pub fn finish(self) -> ChannelReport {
        let report = ChannelReport {
            channel: self.channel(),
            active_ratio: self.active.ratio(&self.config),
            transitions: self.periods.transitions(),
            toggle: self.periods.frequency(),
            invalid_period: self.periods.invalid_period(),
        };

        debug!(
            "[{}] Active ratio {:.6} ({} intervals, {} ticks high), {} transitions",
            report.channel,
            report.active_ratio,
            self.active.intervals(),
            self.active.high_ticks(),
            report.transitions
        );
        if let Some(freq) = report.toggle {
            debug!(
                "[{}] Toggle frequency {:.6} Hz, stddev {:.6} ({} periods)",
                report.channel, freq.mean, freq.stddev, freq.samples
            );
        }
        report
    }
}
