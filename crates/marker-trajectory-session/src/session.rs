//! Per-frame orchestration of deprojection, accumulation and flushing.

use log::{debug, trace, warn};
use marker_trajectory_core::{
    check_pixel_in_frame, deproject_pixel, CameraIntrinsics, DepthAccessor, MarkerObservation,
    MarkerQuad, TrajectorySample,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Clock, FlushDecision, FlushWindow, LogSink, RepresentativePixel, SystemClock, TrackError,
    TrackerParams, TrajectorySink, TrajectorySnapshot, TrajectoryStore, WindowFlush, WindowState,
};

/// What happened to one frame's observations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Observations delivered by the detector.
    pub observed: usize,
    /// Samples appended to the store.
    pub appended: usize,
    /// Observations skipped for lack of depth.
    pub invalid_depth: usize,
    /// Observations dropped for violating the detector contract.
    pub malformed: usize,
    /// Samples handed to the sink if this frame closed a window.
    pub flushed: Option<usize>,
}

/// Owns the trajectory store and drives the flush window.
///
/// Frames must be fed in arrival order; each call to
/// [`TrackingSession::update`] is fully applied, flush included, before it
/// returns.
pub struct TrackingSession<C = SystemClock, S = LogSink> {
    params: TrackerParams,
    clock: C,
    sink: S,
    store: TrajectoryStore,
    window: FlushWindow,
    last_timestamp: Option<f64>,
}

impl TrackingSession<SystemClock, LogSink> {
    /// Wall-clock session with default parameters that logs each window.
    pub fn with_defaults() -> Self {
        let clock = SystemClock::new();
        let params = TrackerParams::default();
        let window = FlushWindow::new(&params.window, clock.now());
        Self {
            params,
            clock,
            sink: LogSink,
            store: TrajectoryStore::new(),
            window,
            last_timestamp: None,
        }
    }
}

impl<C: Clock, S: TrajectorySink> TrackingSession<C, S> {
    /// Validate `params` and open the first window at `clock.now()`.
    pub fn new(params: TrackerParams, clock: C, sink: S) -> Result<Self, TrackError> {
        params.validate()?;
        let window = FlushWindow::new(&params.window, clock.now());
        Ok(Self {
            params,
            clock,
            sink,
            store: TrajectoryStore::new(),
            window,
            last_timestamp: None,
        })
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Process one frame.
    ///
    /// Observations without valid depth or violating the detector contract
    /// are skipped without affecting the rest of the frame. The only error
    /// is unusable `intrinsics`, in which case nothing is applied.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(timestamp = timestamp, markers = observations.len()))
    )]
    pub fn update<D>(
        &mut self,
        timestamp: f64,
        depth: &D,
        intrinsics: &CameraIntrinsics,
        observations: &[MarkerObservation],
    ) -> Result<FrameSummary, TrackError>
    where
        D: DepthAccessor + ?Sized,
    {
        intrinsics.validate()?;

        if let Some(prev) = self.last_timestamp {
            if timestamp < prev {
                warn!("frame timestamp went backwards: {prev:.6} -> {timestamp:.6}");
            }
        }
        self.last_timestamp = Some(timestamp);

        let mut summary = FrameSummary {
            observed: observations.len(),
            ..FrameSummary::default()
        };

        for observation in observations {
            let quad = match observation.quad() {
                Ok(quad) => quad,
                Err(err) => {
                    debug!("dropping observation at t={timestamp:.3}: {err}");
                    summary.malformed += 1;
                    continue;
                }
            };

            let pixel = self.representative_pixel(&quad);
            if let Err(err) = check_pixel_in_frame(pixel, intrinsics.width, intrinsics.height) {
                debug!("dropping marker {} at t={timestamp:.3}: {err}", quad.id);
                summary.malformed += 1;
                continue;
            }
            match deproject_pixel(pixel, depth, intrinsics) {
                Some(point) => {
                    self.store
                        .append(quad.id, TrajectorySample::new(timestamp, point));
                    summary.appended += 1;
                }
                None => {
                    trace!(
                        "marker {} has no depth at ({}, {})",
                        quad.id,
                        pixel.x,
                        pixel.y
                    );
                    summary.invalid_depth += 1;
                }
            }
        }

        let now = self.clock.now();
        if let FlushDecision::Flush {
            window_start,
            window_end,
        } = self.window.poll(now)
        {
            summary.flushed = Some(self.flush(window_start, window_end));
        }

        Ok(summary)
    }

    /// Pixel used to sample depth for `quad`.
    pub fn representative_pixel(&self, quad: &MarkerQuad) -> Point2<i32> {
        match self.params.pixel {
            RepresentativePixel::DiagonalMidpoint => quad.diagonal_midpoint(),
            RepresentativePixel::Centroid => quad.centroid(),
        }
    }

    /// Copy of the current trajectories. No side effects.
    pub fn snapshot(&self) -> TrajectorySnapshot {
        self.store.snapshot()
    }

    pub fn trajectories(&self) -> &TrajectoryStore {
        &self.store
    }

    /// Drop all trajectories. The window timer is left untouched.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Flush immediately and restart the window. Returns the flushed sample count.
    pub fn flush_now(&mut self) -> usize {
        match self.window.force(self.clock.now()) {
            FlushDecision::Flush {
                window_start,
                window_end,
            } => self.flush(window_start, window_end),
            FlushDecision::Continue => 0,
        }
    }

    pub fn window_state(&self) -> WindowState {
        self.window.state()
    }

    /// Clock time the current window opened.
    pub fn window_started_at(&self) -> f64 {
        self.window.started_at()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear the session down into its store and sink.
    pub fn into_parts(self) -> (TrajectoryStore, S) {
        (self.store, self.sink)
    }

    fn flush(&mut self, window_start: f64, window_end: f64) -> usize {
        let trajectories = self.store.take();
        let samples = trajectories.sample_count();
        debug!(
            "flushing {} markers / {samples} samples",
            trajectories.marker_count()
        );
        self.sink.on_flush(WindowFlush {
            window_start,
            window_end,
            trajectories,
        });
        self.window.complete(self.clock.now());
        samples
    }
}
