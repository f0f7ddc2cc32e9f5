//! Concurrent per-channel analysis
//!
//! A decoded [`Capture`] is immutable, so every channel can be analyzed on its own
//! thread over the same shared samples without locking. Each worker sends its
//! report back over a crossbeam channel tagged with its slot, and the results are
//! reassembled in request order.

use super::analyzer::SignalAnalyzer;
use super::types::ChannelReport;
use crate::Result;
use crate::capture::{Capture, Channel};
use std::thread;
use tracing::{debug, info};

/// Analyze several channels of one capture in parallel
///
/// Spawns one scoped thread per requested channel (named `capture_ch<N>`).
/// Reports are returned in the order of `channels` and are identical to calling
/// [`SignalAnalyzer::report`] sequentially. The first failing channel's error
/// is returned.
pub fn analyze_channels(
    analyzer: &SignalAnalyzer,
    capture: &Capture,
    channels: &[Channel],
) -> Result<Vec<ChannelReport>> {
    let (tx, rx) = crossbeam_channel::unbounded();

    info!(
        "Analyzing {} channels over {} samples",
        channels.len(),
        capture.len()
    );

    thread::scope(|scope| -> Result<()> {
        for (slot, &channel) in channels.iter().enumerate() {
            let tx = tx.clone();
            thread::Builder::new()
                .name(format!("capture_ch{}", channel.index()))
                .spawn_scoped(scope, move || {
                    let result = analyzer.report(capture, channel);
                    debug!("[{}] Worker finished (ok={})", channel, result.is_ok());
                    // Receiver outlives the scope
                    let _ = tx.send((slot, result));
                })?;
        }
        Ok(())
    })?;
    drop(tx);

    let mut reports: Vec<Option<ChannelReport>> = vec![None; channels.len()];
    for (slot, result) in rx.iter() {
        reports[slot] = Some(result?);
    }

    Ok(reports.into_iter().flatten().collect())
}
