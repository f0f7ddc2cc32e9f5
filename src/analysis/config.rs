//! Analyzer configuration

use crate::{CaptureError, Result};

/// Default capture device sample rate (ticks per second)
pub const DEFAULT_SAMPLE_RATE: u64 = 24_000_000;

/// Default capture window in seconds
pub const DEFAULT_CAPTURE_SECONDS: f64 = 10.0;

/// Timing parameters of the capture being analyzed
///
/// Neither value can be recovered from the capture file, so both come from the
/// caller. The sample rate is fixed at construction. The window length may be
/// changed before each capture and is the denominator of the active ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    sample_rate: u64,
    capture_seconds: f64,
}

impl AnalyzerConfig {
    /// Create a config for a device ticking at `sample_rate` Hz
    pub fn new(sample_rate: u64) -> Result<Self> {
        if sample_rate == 0 {
            return Err(CaptureError::InvalidSampleRate);
        }
        Ok(Self {
            sample_rate,
            capture_seconds: DEFAULT_CAPTURE_SECONDS,
        })
    }

    /// Set the capture window length (builder pattern)
    pub fn with_capture_length(mut self, seconds: f64) -> Result<Self> {
        self.set_capture_length(seconds)?;
        Ok(self)
    }

    /// Set the capture window length in seconds
    pub fn set_capture_length(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(CaptureError::InvalidCaptureLength(seconds));
        }
        self.capture_seconds = seconds;
        Ok(())
    }

    /// Ticks per second
    pub fn sample_rate(&self) -> u64 {
        self.sample_rate
    }

    /// Capture window in seconds
    pub fn capture_seconds(&self) -> f64 {
        self.capture_seconds
    }

    /// Convert a tick count to seconds
    #[inline]
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 / self.sample_rate as f64
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            capture_seconds: DEFAULT_CAPTURE_SECONDS,
        }
    }
}
