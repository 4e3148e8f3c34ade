//! Core types and pure geometry for marker trajectory tracking.
//!
//! This crate knows nothing about cameras or marker detectors. It takes
//! per-frame marker observations, a depth lookup and the depth sensor
//! intrinsics, and turns a pixel into a metric 3D point.

mod deproject;
mod depth;
mod intrinsics;
mod logger;
mod observation;
mod sample;

pub use deproject::{deproject_pixel, deproject_pixel_to_point};
pub use depth::{DepthAccessor, DepthFrame, DepthFrameView};
pub use intrinsics::{CameraIntrinsics, DistortionModel, IntrinsicsError};
pub use observation::{
    check_pixel_in_frame, MarkerId, MarkerObservation, MarkerQuad, ObservationError,
};
pub use sample::TrajectorySample;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
