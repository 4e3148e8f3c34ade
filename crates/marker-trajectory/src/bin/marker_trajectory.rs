use std::path::{Path, PathBuf};

use clap::Parser;
use marker_trajectory::replay::{replay_recording, Recording};
use marker_trajectory::session::io::{TrackerConfig, TrackingReport};
use marker_trajectory::session::{RepresentativePixel, TrajectorySink, WindowFlush};

use log::LevelFilter;
#[cfg(not(feature = "tracing"))]
use log::{error, info};
#[cfg(feature = "tracing")]
use tracing::{error, info};

#[cfg(feature = "tracing")]
use marker_trajectory::init_tracing;
#[cfg(not(feature = "tracing"))]
use marker_trajectory::core::init_with_level;

/// Replay a recorded depth + marker session and report per-marker trajectories.
#[derive(Debug, Parser)]
#[command(name = "marker-trajectory", version, about)]
struct Cli {
    /// Recording JSON (intrinsics, depth frames, marker detections).
    recording: PathBuf,
    /// Tracker config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Flush interval in seconds.
    #[arg(long)]
    interval: Option<f64>,
    /// Never flush; report everything as one trailing window.
    #[arg(long)]
    no_window: bool,
    /// Sample depth at the corner centroid instead of the diagonal midpoint.
    #[arg(long)]
    centroid: bool,
    /// Report output path.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Prints one line per flushed window and keeps it for the report.
#[derive(Default)]
struct ReportSink {
    flushes: Vec<WindowFlush>,
}

impl TrajectorySink for ReportSink {
    fn on_flush(&mut self, flush: WindowFlush) {
        println!(
            "window {:.3}s..{:.3}s: {} markers, {} samples",
            flush.window_start,
            flush.window_end,
            flush.trajectories.marker_count(),
            flush.trajectories.sample_count()
        );
        self.flushes.push(flush);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = verbosity(cli.verbose);

    #[cfg(not(feature = "tracing"))]
    init_with_level(level)?;

    #[cfg(feature = "tracing")]
    init_tracing(false, level);

    run(cli)
}

/// `-v` enables debug output, `-vv` and more enable trace.
fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match &cli.config {
        Some(path) => TrackerConfig::load_json(path)?,
        None => TrackerConfig::default(),
    };

    let mut params = cfg.tracker.clone();
    if let Some(interval) = cli.interval {
        params.window.interval_secs = interval;
    }
    if cli.no_window {
        params.window.enabled = false;
    }
    if cli.centroid {
        params.pixel = RepresentativePixel::Centroid;
    }
    params.validate()?;

    let recording = Recording::load_json(&cli.recording)?;
    info!(
        "loaded {} frames from {}",
        recording.frames.len(),
        cli.recording.display()
    );

    let out_path = cli.output.unwrap_or_else(|| cfg.output_path());
    let mut report = TrackingReport::new(cli.recording.to_string_lossy(), params.clone());

    let base_dir = cli.recording.parent().unwrap_or_else(|| Path::new("."));
    let outcome = match replay_recording(&recording, base_dir, params, ReportSink::default()) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("replay failed: {err}");
            report.set_error(&err);
            report.write_json(&out_path)?;
            return Err(err.into());
        }
    };

    report.frames = outcome.frames;
    report.flushes = outcome.sink.flushes;
    report.remaining = outcome.remaining;

    report.write_json(&out_path)?;
    println!(
        "{} windows, {} samples; wrote report JSON to {}",
        report.flushes.len(),
        report.sample_count(),
        out_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_raises_the_log_level() {
        assert_eq!(verbosity(0), LevelFilter::Info);
        assert_eq!(verbosity(1), LevelFilter::Debug);
        assert_eq!(verbosity(2), LevelFilter::Trace);
        assert_eq!(verbosity(9), LevelFilter::Trace);
    }
}
