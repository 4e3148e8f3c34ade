//! Per-marker trajectory accumulation with a windowed flush lifecycle.
//!
//! A [`TrackingSession`] consumes one frame at a time: marker observations,
//! a depth lookup and the depth intrinsics. Each marker with valid depth
//! contributes one [`TrajectorySample`] to the [`TrajectoryStore`]. Every
//! `window.interval_secs` the accumulated trajectories are handed to a
//! [`TrajectorySink`] and the store is cleared.
//!
//! ```
//! use marker_trajectory_core::{CameraIntrinsics, MarkerObservation};
//! use marker_trajectory_session::{CollectingSink, ManualClock, TrackerParams, TrackingSession};
//! use nalgebra::Point2;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = ManualClock::new(0.0);
//! let mut session =
//!     TrackingSession::new(TrackerParams::default(), clock.clone(), CollectingSink::default())?;
//! let intrinsics = CameraIntrinsics::pinhole(640, 480, 600.0, 600.0, 320.0, 240.0);
//! let marker = MarkerObservation::new(
//!     3,
//!     [
//!         Point2::new(300.0, 220.0),
//!         Point2::new(340.0, 220.0),
//!         Point2::new(340.0, 260.0),
//!         Point2::new(300.0, 260.0),
//!     ],
//! );
//! let depth = |_x: i32, _y: i32| 2.0_f32;
//!
//! let summary = session.update(0.0, &depth, &intrinsics, &[marker])?;
//! assert_eq!(summary.appended, 1);
//! assert_eq!(session.snapshot().sample_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! [`TrajectorySample`]: marker_trajectory_core::TrajectorySample

mod clock;
mod error;
pub mod io;
mod params;
mod session;
mod sink;
mod store;
mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TrackError;
pub use params::{RepresentativePixel, TrackerParams, WindowParams};
pub use session::{FrameSummary, TrackingSession};
pub use sink::{CollectingSink, LogSink, TrajectorySink, WindowFlush};
pub use store::{TrajectorySnapshot, TrajectoryStore};
pub use window::{FlushDecision, FlushWindow, WindowState};
