//! Signal analyzer
//!
//! Computes per-channel timing metrics over a decoded capture:
//!
//! - **Active ratio**: time spent high divided by the configured capture window.
//!   Used to measure context-switch overhead from a pin raised during switches.
//! - **Toggle frequency**: mean and population standard deviation of
//!   `sample_rate / period` across consecutive edges. Used to check task
//!   periodicity from a pin toggled by each task.
//!
//! All queries are read-only. They accept anything that iterates samples in
//! capture order (`&Capture`, `&[Sample]`, `Vec<Sample>`, ...), so the same
//! capture can be queried repeatedly or from several threads at once.
//!
//! # Example
//! ```no_run
//! use logic_capture::{AnalyzerConfig, Capture, Channel, SignalAnalyzer};
//!
//! let config = AnalyzerConfig::new(24_000_000)?.with_capture_length(10.0)?;
//! let analyzer = SignalAnalyzer::new(config);
//! let capture = Capture::from_file("test_cpu_usage.bin")?;
//!
//! let overhead = analyzer.get_active_usage(&capture, Channel::Channel2)? * 100.0;
//! let task = analyzer.get_toggle_frequency(&capture, Channel::Channel0)?;
//! println!("overhead {:.3}%, task {:.4} Hz ± {:.4}", overhead, task.mean, task.stddev);
//! # Ok::<(), logic_capture::CaptureError>(())
//! ```

use super::config::AnalyzerConfig;
use super::tracker::ChannelTracker;
use super::types::{ChannelReport, ToggleFrequency};
use crate::Result;
use crate::capture::{CaptureReader, Channel, Sample};
use std::borrow::Borrow;
use std::io::Read;
use tracing::info;

/// Timing metric queries for captures taken with one [`AnalyzerConfig`]
#[derive(Debug, Clone, Default)]
pub struct SignalAnalyzer {
    config: AnalyzerConfig,
}

impl SignalAnalyzer {
    /// Create an analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Set the capture window used as the active-ratio denominator
    pub fn set_capture_length(&mut self, seconds: f64) -> Result<()> {
        self.config.set_capture_length(seconds)
    }

    /// Fraction of the capture window `channel` spent high
    ///
    /// Only intervals closed by a falling edge count. The result is not clamped:
    /// a window shorter than the capture can yield a ratio above 1. A channel
    /// that never goes high yields 0.
    pub fn get_active_usage<I>(&self, samples: I, channel: Channel) -> Result<f64>
    where
        I: IntoIterator,
        I::Item: Borrow<Sample>,
    {
        Ok(self.report(samples, channel)?.active_ratio)
    }

    /// Mean and spread of the toggle frequency of `channel`
    ///
    /// Fails with [`InsufficientData`](crate::CaptureError::InsufficientData)
    /// when fewer than two edges occur, since there is no period to measure,
    /// and with [`InvalidPeriod`](crate::CaptureError::InvalidPeriod) when two
    /// edges share a tick.
    pub fn get_toggle_frequency<I>(&self, samples: I, channel: Channel) -> Result<ToggleFrequency>
    where
        I: IntoIterator,
        I::Item: Borrow<Sample>,
    {
        self.report(samples, channel)?.toggle_frequency()
    }

    /// Tracker for incremental single-pass analysis of `channel`
    pub fn tracker(&self, channel: Channel) -> ChannelTracker {
        ChannelTracker::new(self.config, channel)
    }

    /// Both metrics for one channel in a single pass
    pub fn report<I>(&self, samples: I, channel: Channel) -> Result<ChannelReport>
    where
        I: IntoIterator,
        I::Item: Borrow<Sample>,
    {
        let mut tracker = self.tracker(channel);
        for sample in samples {
            tracker.push(sample.borrow())?;
        }
        Ok(tracker.finish())
    }

    /// Stream a capture once, producing a report for every requested channel
    ///
    /// Memory use is independent of capture length. Reports come back in the
    /// order of `channels`. The first I/O error, or a high interval that ends
    /// before it starts, aborts the pass.
    pub fn analyze_reader<R: Read>(
        &self,
        reader: CaptureReader<R>,
        channels: &[Channel],
    ) -> Result<Vec<ChannelReport>> {
        let mut trackers: Vec<ChannelTracker> =
            channels.iter().map(|&ch| self.tracker(ch)).collect();
        let mut count: u64 = 0;

        for sample in reader {
            let sample = sample?;
            for tracker in &mut trackers {
                tracker.push(&sample)?;
            }
            count += 1;
        }

        info!(
            "Streamed {} samples across {} channels",
            count,
            trackers.len()
        );
        Ok(trackers.into_iter().map(ChannelTracker::finish).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaptureError;
    use crate::analysis::analyze_channels;
    use crate::capture::{Capture, encode_records};
    use std::io::Cursor;

    const RATE: u64 = 1_000;

    fn analyzer(window_seconds: f64) -> SignalAnalyzer {
        SignalAnalyzer::new(
            AnalyzerConfig::new(RATE)
                .unwrap()
                .with_capture_length(window_seconds)
                .unwrap(),
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    /// Marker followed by `channel` toggling every `period` ticks, `edges` times
    fn square_wave(channel: Channel, period: u64, edges: u64) -> Capture {
        let mut samples = vec![Sample::new(0, 0)];
        for i in 1..=edges {
            let state = if i % 2 == 1 { channel.mask() } else { 0 };
            samples.push(Sample::new(i * period, state));
        }
        Capture::from(samples)
    }

    #[test]
    fn test_active_usage_duty_cycle() {
        // high for 250 of every 1000 ticks across 4 seconds
        let mut samples = vec![Sample::new(0, 0)];
        for cycle in 0..4u64 {
            let base = cycle * 1_000;
            samples.push(Sample::new(base + 100, 0b100));
            samples.push(Sample::new(base + 350, 0b000));
        }
        samples.push(Sample::new(4_000, 0));

        let ratio = analyzer(4.0)
            .get_active_usage(&samples, Channel::Channel2)
            .unwrap();
        assert_close(ratio, 0.25);
    }

    #[test]
    fn test_active_usage_never_high_is_zero() {
        let capture = square_wave(Channel::Channel0, 10, 20);
        let ratio = analyzer(1.0)
            .get_active_usage(&capture, Channel::Channel3)
            .unwrap();
        assert_eq!(ratio, 0.0);
        assert_eq!(
            analyzer(1.0)
                .get_active_usage(&Capture::default(), Channel::Channel0)
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_active_usage_unclosed_interval_ignored() {
        let samples = [
            Sample::new(0, 0),
            Sample::new(100, 1),
            Sample::new(200, 0),
            Sample::new(900, 1),
        ];
        let ratio = analyzer(1.0)
            .get_active_usage(&samples, Channel::Channel0)
            .unwrap();
        assert_close(ratio, 0.1);
    }

    #[test]
    fn test_active_usage_initially_high_marker() {
        // starts high: the first fall has no open interval
        let samples = [
            Sample::new(0, 1),
            Sample::new(300, 0),
            Sample::new(500, 1),
            Sample::new(600, 0),
        ];
        let ratio = analyzer(1.0)
            .get_active_usage(&samples, Channel::Channel0)
            .unwrap();
        assert_close(ratio, 0.1);
    }

    #[test]
    fn test_active_usage_not_clamped() {
        let samples = [Sample::new(0, 0), Sample::new(1, 1), Sample::new(3_001, 0)];
        let ratio = analyzer(1.0)
            .get_active_usage(&samples, Channel::Channel0)
            .unwrap();
        assert_close(ratio, 3.0);
    }

    #[test]
    fn test_toggle_frequency_periodic() {
        // period 1500 ticks at 1 kHz -> 0.666.. Hz
        let capture = square_wave(Channel::Channel0, 1_500, 12);
        let freq = analyzer(10.0)
            .get_toggle_frequency(&capture, Channel::Channel0)
            .unwrap();
        assert_close(freq.mean, 1_000.0 / 1_500.0);
        assert!(freq.stddev < 1e-9);
        assert_eq!(freq.samples, 11);
        assert!(freq.within(0.666666666, 0.001));
    }

    #[test]
    fn test_toggle_frequency_jitter() {
        // periods 100 and 200 ticks -> 10 Hz and 5 Hz
        let samples = [
            Sample::new(0, 0),
            Sample::new(100, 1),
            Sample::new(200, 0),
            Sample::new(400, 1),
        ];
        let freq = analyzer(1.0)
            .get_toggle_frequency(&samples, Channel::Channel0)
            .unwrap();
        assert_close(freq.mean, 7.5);
        assert_close(freq.stddev, 2.5);
    }

    #[test]
    fn test_toggle_marker_never_contributes() {
        // marker low or high, the result only reflects real edges
        for marker_state in [0x00, 0xFF] {
            let samples = [
                Sample::new(0, marker_state),
                Sample::new(1_000, 0x01),
                Sample::new(2_000, 0x00),
                Sample::new(3_000, 0x01),
            ];
            let freq = analyzer(1.0)
                .get_toggle_frequency(&samples, Channel::Channel0)
                .unwrap();
            assert_close(freq.mean, 1.0);
            assert!(freq.stddev < 1e-12);
        }
    }

    #[test]
    fn test_toggle_single_transition_is_insufficient() {
        let samples = [Sample::new(0, 0), Sample::new(10, 1), Sample::new(20, 1)];
        match analyzer(1.0).get_toggle_frequency(&samples, Channel::Channel0) {
            Err(CaptureError::InsufficientData { transitions: 1 }) => {}
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_no_transition_is_insufficient() {
        let capture = square_wave(Channel::Channel1, 10, 5);
        match analyzer(1.0).get_toggle_frequency(&capture, Channel::Channel6) {
            Err(CaptureError::InsufficientData { transitions: 0 }) => {}
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_backwards_timestamp() {
        let samples = [Sample::new(0, 0), Sample::new(50, 1), Sample::new(40, 0)];
        assert!(matches!(
            analyzer(1.0).get_toggle_frequency(&samples, Channel::Channel0),
            Err(CaptureError::InvalidPeriod { start: 50, end: 40 })
        ));
    }

    #[test]
    fn test_repeat_queries_are_stable() {
        let capture = square_wave(Channel::Channel1, 333, 30);
        let analyzer = analyzer(10.0);
        let first = analyzer
            .get_toggle_frequency(&capture, Channel::Channel1)
            .unwrap();
        let second = analyzer
            .get_toggle_frequency(&capture, Channel::Channel1)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_matches_individual_queries() {
        let capture = square_wave(Channel::Channel4, 250, 17);
        let analyzer = analyzer(5.0);

        let report = analyzer.report(&capture, Channel::Channel4).unwrap();
        assert_eq!(
            report.active_ratio,
            analyzer
                .get_active_usage(&capture, Channel::Channel4)
                .unwrap()
        );
        assert_eq!(
            report.toggle_frequency().unwrap(),
            analyzer
                .get_toggle_frequency(&capture, Channel::Channel4)
                .unwrap()
        );
        assert_eq!(report.transitions, 17);
    }

    #[test]
    fn test_analyze_reader_matches_materialised() {
        let capture = square_wave(Channel::Channel0, 100, 9);
        let data = encode_records(capture.samples());
        let analyzer = analyzer(1.0);
        let channels = [Channel::Channel0, Channel::Channel1];

        let streamed = analyzer
            .analyze_reader(CaptureReader::new(Cursor::new(data)), &channels)
            .unwrap();
        assert_eq!(streamed.len(), 2);
        assert_eq!(
            streamed[0],
            analyzer.report(&capture, Channel::Channel0).unwrap()
        );
        assert_eq!(streamed[1].channel, Channel::Channel1);
        assert!(streamed[1].toggle.is_none());
    }

    #[test]
    fn test_set_capture_length_rescales_ratio() {
        let samples = [Sample::new(0, 0), Sample::new(100, 1), Sample::new(600, 0)];
        let mut analyzer = analyzer(1.0);
        assert_close(
            analyzer
                .get_active_usage(&samples, Channel::Channel0)
                .unwrap(),
            0.5,
        );

        analyzer.set_capture_length(2.0).unwrap();
        assert_close(
            analyzer
                .get_active_usage(&samples, Channel::Channel0)
                .unwrap(),
            0.25,
        );
        assert!(analyzer.set_capture_length(0.0).is_err());
    }

    #[test]
    fn test_shared_tick_edges_agree_across_paths() {
        // CH0 glitches high and low within tick 500
        let capture = Capture::from(vec![
            Sample::new(0, 0),
            Sample::new(100, 1),
            Sample::new(300, 0),
            Sample::new(500, 1),
            Sample::new(500, 0),
        ]);
        let analyzer = analyzer(1.0);

        let direct = analyzer
            .get_active_usage(&capture, Channel::Channel0)
            .unwrap();
        assert_close(direct, 0.2);

        let report = analyzer.report(&capture, Channel::Channel0).unwrap();
        assert_eq!(report.active_ratio, direct);

        let swept = analyze_channels(&analyzer, &capture, &[Channel::Channel0]).unwrap();
        assert_eq!(swept[0].active_ratio, direct);

        let data = encode_records(capture.samples());
        let streamed = analyzer
            .analyze_reader(CaptureReader::new(Cursor::new(data)), &[Channel::Channel0])
            .unwrap();
        assert_eq!(streamed[0].active_ratio, direct);

        assert!(matches!(
            analyzer.get_toggle_frequency(&capture, Channel::Channel0),
            Err(CaptureError::InvalidPeriod {
                start: 500,
                end: 500
            })
        ));
        assert!(matches!(
            report.toggle_frequency(),
            Err(CaptureError::InvalidPeriod {
                start: 500,
                end: 500
            })
        ));
    }
}
