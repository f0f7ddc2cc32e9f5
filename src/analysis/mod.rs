//! Timing analysis over decoded captures
//!
//! - **SignalAnalyzer**: active-ratio and toggle-frequency queries for one channel
//! - **ChannelTracker**: both metrics fed one sample at a time
//! - **analyze_channels**: one worker thread per channel over a shared capture

mod analyzer;
pub mod config;
mod metrics;
mod stats;
mod sweep;
mod tracker;
pub mod transitions;
pub mod types;

pub use analyzer::SignalAnalyzer;
pub use config::{AnalyzerConfig, DEFAULT_CAPTURE_SECONDS, DEFAULT_SAMPLE_RATE};
pub use sweep::analyze_channels;
pub use tracker::ChannelTracker;
pub use transitions::EdgeDetector;
pub use types::{ChannelReport, Edge, ToggleFrequency};
