//! Example: Validate scheduler timing from a logic capture
//!
//! Checks that context-switch overhead (a pin held high during every switch)
//! stays under a limit, and that task pins toggle at their expected rates.
//!
//! Usage:
//!   cargo run --release --example validate_scheduler -- \
//!       --file test_cpu_usage.bin \
//!       --overhead-channel 2 --max-overhead-percent 0.5 \
//!       --toggle 0=0.666666666 --toggle 1=1.0
//!
//! Without hardware, write a synthetic trace first:
//!   cargo run --example validate_scheduler -- --file synth.bin --synthesize \
//!       --toggle 0=0.666666666 --toggle 1=1.0

use clap::Parser;
use logic_capture::{
    AnalyzerConfig, Capture, Channel, Sample, SignalAnalyzer, analyze_channels, encode_records,
};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to binary capture file
    #[arg(short, long)]
    file: String,

    /// Capture device sample rate in ticks per second
    #[arg(long, default_value_t = 24_000_000)]
    sample_rate: u64,

    /// Capture window in seconds
    #[arg(long, default_value_t = 10.0)]
    capture_seconds: f64,

    /// Channel raised during context switches
    #[arg(long, default_value = "2")]
    overhead_channel: Channel,

    /// Maximum allowed context-switch overhead in percent
    #[arg(long, default_value_t = 0.5)]
    max_overhead_percent: f64,

    /// Expected toggle frequency as CHANNEL=HZ (repeatable)
    #[arg(long = "toggle", value_parser = parse_toggle)]
    toggles: Vec<(Channel, f64)>,

    /// Frequency tolerance in Hz (also the stddev limit)
    #[arg(long, default_value_t = 0.001)]
    tolerance: f64,

    /// Write a synthetic trace matching the expectations to --file first
    #[arg(long)]
    synthesize: bool,
}

fn parse_toggle(s: &str) -> Result<(Channel, f64), String> {
    let (channel, hz) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CHANNEL=HZ, got '{}'", s))?;
    let channel = channel.parse::<Channel>().map_err(|e| e.to_string())?;
    let hz = hz
        .parse::<f64>()
        .map_err(|e| format!("invalid frequency '{}': {}", hz, e))?;
    if !hz.is_finite() || hz <= 0.0 {
        return Err(format!("frequency must be positive, got '{}'", hz));
    }
    Ok((channel, hz))
}

/// Synthesize a trace: each toggle channel flips at its rate, and the overhead
/// channel pulses every millisecond at a quarter of the allowed overhead.
fn synthesize(args: &Args) -> Vec<Sample> {
    let rate = args.sample_rate as f64;
    let total_ticks = (args.capture_seconds * rate) as u64;
    let tick_ms = ((rate / 1_000.0) as u64).max(1);
    let pulse = (tick_ms as f64 * args.max_overhead_percent / 400.0) as u64;

    // Each task flips its pin every 1/f seconds
    let mut next_toggle: Vec<(Channel, u64, u64)> = args
        .toggles
        .iter()
        .map(|&(ch, hz)| {
            // Faster than the sample rate still flips once per tick
            let period = ((rate / hz) as u64).max(1);
            (ch, period, period)
        })
        .collect();

    let overhead = args.overhead_channel.mask();
    let mut state = 0u8;
    let mut samples = vec![Sample::new(0, state)];
    let mut t = tick_ms;

    while t < total_ticks {
        for (channel, period, next) in next_toggle.iter_mut() {
            while *next <= t {
                state ^= channel.mask();
                *next += *period;
            }
        }
        samples.push(Sample::new(t, state | overhead));
        samples.push(Sample::new(t + pulse.max(1), state & !overhead));
        t += tick_ms;
    }
    samples
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("=== Scheduler Validation ===");
    info!("File: {}", args.file);

    let config =
        AnalyzerConfig::new(args.sample_rate)?.with_capture_length(args.capture_seconds)?;

    if args.synthesize {
        let samples = synthesize(&args);
        std::fs::write(&args.file, encode_records(&samples))?;
        info!("Wrote {} synthetic samples", samples.len());
    }

    let analyzer = SignalAnalyzer::new(config);
    let capture = Capture::from_file(&args.file)?;

    let mut channels = vec![args.overhead_channel];
    channels.extend(args.toggles.iter().map(|&(ch, _)| ch));
    let reports = analyze_channels(&analyzer, &capture, &channels)?;

    let mut failures = 0;

    let overhead = reports[0].active_percent();
    info!("Context change overhead = {:.4} %", overhead);
    if overhead >= args.max_overhead_percent {
        error!(
            "Overhead {:.4} % exceeds limit of {} %",
            overhead, args.max_overhead_percent
        );
        failures += 1;
    }

    for (report, &(channel, target)) in reports[1..].iter().zip(&args.toggles) {
        match report.toggle_frequency() {
            Ok(freq) => {
                info!(
                    "{}: freq mean = {:.6} Hz, stddev = {:.6} ({} periods)",
                    channel, freq.mean, freq.stddev, freq.samples
                );
                if !freq.within(target, args.tolerance) {
                    error!("{}: expected {} Hz ± {}", channel, target, args.tolerance);
                    failures += 1;
                }
            }
            Err(e) => {
                error!("{}: {}", channel, e);
                failures += 1;
            }
        }
    }

    if failures == 0 {
        info!("All checks passed");
        Ok(ExitCode::SUCCESS)
    } else {
        error!("{} check(s) failed", failures);
        Ok(ExitCode::FAILURE)
    }
}
