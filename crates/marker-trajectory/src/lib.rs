//! High-level facade for the `marker-trajectory-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core geometry types and the tracking session
//! - (feature `image`) replay of recorded depth frames + marker detections
//! - (feature `cli`) the `marker-trajectory` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use marker_trajectory::replay::{replay_recording, Recording};
//! use marker_trajectory::session::{CollectingSink, TrackerParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recording = Recording::load_json("session/recording.json")?;
//! let outcome = replay_recording(
//!     &recording,
//!     "session".as_ref(),
//!     TrackerParams::default(),
//!     CollectingSink::default(),
//! )?;
//! for flush in &outcome.sink.flushes {
//!     println!("{} markers", flush.trajectories.marker_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `marker_trajectory::core`: intrinsics, depth lookup, deprojection, observations.
//! - `marker_trajectory::session`: trajectory store, flush window, tracking session.
//! - `marker_trajectory::replay` (feature `image`): drive a session from a recording.

pub use marker_trajectory_core as core;
pub use marker_trajectory_session as session;

pub use marker_trajectory_core::{
    deproject_pixel, CameraIntrinsics, DepthAccessor, MarkerId, MarkerObservation,
    TrajectorySample,
};
pub use marker_trajectory_session::{
    TrackError, TrackerParams, TrackingSession, TrajectorySink, TrajectorySnapshot, WindowFlush,
};

#[cfg(feature = "image")]
pub mod replay;

/// Install the `tracing` subscriber and route `log` records into it.
///
/// `default_level` applies when `RUST_LOG` is not set.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: log::LevelFilter) {
    let _ = tracing_log::LogTracer::init();
    marker_trajectory_core::init_tracing(json, default_level);
}
