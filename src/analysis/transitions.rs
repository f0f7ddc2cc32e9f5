//! Edge detection over a sample sequence
//!
//! Both metrics share one notion of a transition:
//!
//! 1. The channel level starts low before the first sample.
//! 2. Every sample updates the remembered level, including the timestamp-0 marker.
//! 3. A level change is an [`Edge`] only when the sample's timestamp is nonzero.
//!
//! A well-formed capture begins with the marker, so the remembered level matches
//! the real starting level by the time the first real edge can occur.

use super::types::Edge;
use crate::capture::{Channel, Sample};
use tracing::trace;

/// Sample-at-a-time edge detector for a single channel
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    channel: Channel,
    prev_level: bool,
}

impl EdgeDetector {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            prev_level: false,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Feed the next sample; returns the edge it completes, if any
    #[inline]
    pub fn update(&mut self, sample: &Sample) -> Option<Edge> {
        let level = sample.level(self.channel);
        let changed = level != self.prev_level;
        self.prev_level = level;

        if changed && !sample.is_marker() {
            trace!(
                "[{}] {} edge at t={}",
                self.channel,
                if level { "rising" } else { "falling" },
                sample.timestamp
            );
            Some(Edge {
                timestamp: sample.timestamp,
                rising: level,
            })
        } else {
            None
        }
    }
}
