//! Flush window state machine.
//!
//! The window only decides *when* to flush. Performing the flush (handing
//! trajectories to a sink, clearing the store) is up to the owner, which
//! reports completion through [`FlushWindow::complete`].

use serde::{Deserialize, Serialize};

use crate::WindowParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    Accumulating,
    Flushing,
}

/// Outcome of [`FlushWindow::poll`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlushDecision {
    Continue,
    Flush { window_start: f64, window_end: f64 },
}

#[derive(Clone, Debug)]
pub struct FlushWindow {
    state: WindowState,
    enabled: bool,
    interval_secs: f64,
    started_at: f64,
    flush_at: f64,
}

impl FlushWindow {
    /// Start in `Accumulating` with the first window opening at `now`.
    pub fn new(params: &WindowParams, now: f64) -> Self {
        Self {
            state: WindowState::Accumulating,
            enabled: params.enabled,
            interval_secs: params.interval_secs,
            started_at: now,
            flush_at: now,
        }
    }

    #[inline]
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Time the current window opened.
    #[inline]
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    #[inline]
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.started_at
    }

    /// `Accumulating -> Flushing` once `interval_secs` have elapsed.
    ///
    /// A disabled window never fires. While `Flushing`, the pending flush is
    /// returned again until [`FlushWindow::complete`] is called.
    pub fn poll(&mut self, now: f64) -> FlushDecision {
        match self.state {
            WindowState::Flushing => self.pending(),
            WindowState::Accumulating => {
                if self.enabled && self.elapsed(now) >= self.interval_secs {
                    self.begin(now)
                } else {
                    FlushDecision::Continue
                }
            }
        }
    }

    /// Enter `Flushing` regardless of elapsed time.
    pub fn force(&mut self, now: f64) -> FlushDecision {
        match self.state {
            WindowState::Flushing => self.pending(),
            WindowState::Accumulating => self.begin(now),
        }
    }

    /// `Flushing -> Accumulating`; the next window opens at `now`.
    pub fn complete(&mut self, now: f64) {
        if self.state == WindowState::Flushing {
            self.state = WindowState::Accumulating;
            self.started_at = now;
        }
    }

    fn begin(&mut self, now: f64) -> FlushDecision {
        self.state = WindowState::Flushing;
        self.flush_at = now;
        self.pending()
    }

    fn pending(&self) -> FlushDecision {
        FlushDecision::Flush {
            window_start: self.started_at,
            window_end: self.flush_at,
        }
    }
}
