//! Receivers of flushed trajectory windows.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::TrajectorySnapshot;

/// Trajectories accumulated during one flush window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowFlush {
    /// Clock time the window opened.
    pub window_start: f64,
    /// Clock time the window was flushed.
    pub window_end: f64,
    pub trajectories: TrajectorySnapshot,
}

/// Consumer of flushed windows, e.g. a plotter or a report writer.
pub trait TrajectorySink {
    fn on_flush(&mut self, flush: WindowFlush);
}

impl<F> TrajectorySink for F
where
    F: FnMut(WindowFlush),
{
    fn on_flush(&mut self, flush: WindowFlush) {
        self(flush)
    }
}

/// Keeps every flushed window in memory.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    pub flushes: Vec<WindowFlush>,
}

impl CollectingSink {
    pub fn into_flushes(self) -> Vec<WindowFlush> {
        self.flushes
    }
}

impl TrajectorySink for CollectingSink {
    fn on_flush(&mut self, flush: WindowFlush) {
        self.flushes.push(flush);
    }
}

/// Logs a summary of each flushed window and drops it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TrajectorySink for LogSink {
    fn on_flush(&mut self, flush: WindowFlush) {
        info!(
            "window {:.3}s..{:.3}s: {} markers, {} samples",
            flush.window_start,
            flush.window_end,
            flush.trajectories.marker_count(),
            flush.trajectories.sample_count()
        );
        for (id, samples) in &flush.trajectories.trajectories {
            if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
                debug!(
                    "marker {id}: {} samples, ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
                    samples.len(),
                    first.x,
                    first.y,
                    first.z,
                    last.x,
                    last.y,
                    last.z
                );
            }
        }
    }
}
