//! Logic-analyzer capture decoder and timing analyzer
//!
//! This library decodes binary captures from an 8-channel logic analyzer and
//! derives the timing metrics used to validate a real-time scheduler on target
//! hardware: how long a pin is held high (e.g. context-switch overhead) and how
//! regularly a pin toggles (e.g. task periodicity).
//!
//! # Architecture
//!
//! - **Capture / CaptureReader**: decode the flat 9-byte record format, eagerly or
//!   one record at a time
//! - **SignalAnalyzer**: active-ratio and toggle-frequency queries per channel
//! - **analyze_channels**: parallel per-channel sweep over one shared capture
//!
//! # Example
//!
//! ```no_run
//! use logic_capture::{AnalyzerConfig, Capture, Channel, SignalAnalyzer};
//!
//! let analyzer = SignalAnalyzer::new(AnalyzerConfig::new(24_000_000)?);
//! let capture = Capture::from_file("capture.bin")?;
//! let freq = analyzer.get_toggle_frequency(&capture, Channel::Channel1)?;
//! assert!(freq.within(1.0, 0.001));
//! # Ok::<(), logic_capture::CaptureError>(())
//! ```

use thiserror::Error;

pub mod analysis;
pub mod capture;

pub use capture::{Capture, CaptureReader, Channel, RECORD_SIZE, Sample, encode_records};

pub use analysis::{
    AnalyzerConfig, ChannelReport, ChannelTracker, SignalAnalyzer, ToggleFrequency,
    analyze_channels,
};

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Insufficient data: {transitions} transition(s), need at least 2")]
    InsufficientData { transitions: usize },

    #[error("Invalid period: timestamp {end} does not follow {start}")]
    InvalidPeriod { start: u64, end: u64 },

    #[error("Invalid channel number: {0}")]
    InvalidChannel(usize),

    #[error("Cannot parse channel: {0:?}")]
    ParseChannel(String),

    #[error("Sample rate must be greater than zero")]
    InvalidSampleRate,

    #[error("Capture length must be positive and finite, got {0}")]
    InvalidCaptureLength(f64),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
