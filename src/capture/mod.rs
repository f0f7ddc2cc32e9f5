//! Capture decoding
//!
//! - **Sample**: one timestamped observation of all eight channels
//! - **Channel**: one-hot selector for a single bit of the state mask
//! - **CaptureReader**: lazy record-by-record decoder for large files
//! - **Capture**: the fully decoded, immutable sample sequence

mod channel;
mod reader;
mod sample;

pub use channel::Channel;
pub use reader::{Capture, CaptureReader};
pub use sample::{RECORD_SIZE, Sample, encode_records};
