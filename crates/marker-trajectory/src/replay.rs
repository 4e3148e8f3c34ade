//! Replay recorded depth frames and marker detections through a session.
//!
//! A recording is a JSON file listing, per frame, a timestamp, a 16-bit
//! depth PNG (raw z16 units) and the detector output for that frame. It
//! stands in for a live camera and detector.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{CameraIntrinsics, DepthFrame, MarkerObservation};
use crate::session::io::TrackIoError;
use crate::session::{
    Clock, FrameSummary, ManualClock, TrackError, TrackerParams, TrackingSession, TrajectorySink,
    TrajectorySnapshot,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while replaying a recording.
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TrackIo(#[from] TrackIoError),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("depth image {path} is {got_width}x{got_height}, intrinsics expect {width}x{height}")]
    DepthSize {
        path: PathBuf,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

fn default_depth_scale() -> f32 {
    0.001
}

/// One recorded frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Seconds.
    pub timestamp: f64,
    /// 16-bit grayscale PNG, relative to the recording file.
    pub depth_path: String,
    #[serde(default)]
    pub markers: Vec<MarkerObservation>,
}

/// A recorded tracking session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub intrinsics: CameraIntrinsics,
    /// Meters per raw depth unit.
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f32,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this recording to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Result of a replay run.
#[derive(Debug)]
pub struct ReplayOutcome<S> {
    pub frames: usize,
    pub summaries: Vec<FrameSummary>,
    /// Trajectories still accumulating when the recording ended.
    pub remaining: TrajectorySnapshot,
    pub sink: S,
}

/// Load a z16 depth PNG.
pub fn load_depth_png(path: &Path, depth_scale: f32) -> Result<DepthFrame, ReplayError> {
    let img = image::ImageReader::open(path)?.decode()?.to_luma16();
    Ok(DepthFrame {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
        depth_scale,
    })
}

/// Drive a [`TrackingSession`] with every frame of `recording`, in order.
///
/// Depth paths are resolved against `base_dir`. The session clock follows
/// the recorded timestamps, so flush windows are reproducible.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(recording, params, sink), fields(frames = recording.frames.len()))
)]
pub fn replay_recording<S: TrajectorySink>(
    recording: &Recording,
    base_dir: &Path,
    params: TrackerParams,
    sink: S,
) -> Result<ReplayOutcome<S>, ReplayError> {
    recording.intrinsics.validate().map_err(TrackError::from)?;

    let start = recording.frames.first().map_or(0.0, |f| f.timestamp);
    let clock = ManualClock::new(start);
    let mut session = TrackingSession::new(params, clock.clone(), sink)?;
    let mut summaries = Vec::with_capacity(recording.frames.len());

    for frame in &recording.frames {
        let path = base_dir.join(&frame.depth_path);
        let depth = load_depth_png(&path, recording.depth_scale)?;
        check_depth_size(&path, &depth, &recording.intrinsics)?;

        clock.set(frame.timestamp);
        let summary = session.update(
            frame.timestamp,
            &depth,
            &recording.intrinsics,
            &frame.markers,
        )?;
        debug!(
            "t={:.3}s: {}/{} markers tracked",
            frame.timestamp, summary.appended, summary.observed
        );
        summaries.push(summary);
    }

    info!(
        "replayed {} frames up to t={:.3}s",
        recording.frames.len(),
        clock.now()
    );

    let remaining = session.snapshot();
    let (_, sink) = session.into_parts();
    Ok(ReplayOutcome {
        frames: recording.frames.len(),
        summaries,
        remaining,
        sink,
    })
}

fn check_depth_size(
    path: &Path,
    depth: &DepthFrame,
    intrinsics: &CameraIntrinsics,
) -> Result<(), ReplayError> {
    if depth.width != intrinsics.width as usize || depth.height != intrinsics.height as usize {
        return Err(ReplayError::DepthSize {
            path: path.to_path_buf(),
            width: intrinsics.width,
            height: intrinsics.height,
            got_width: depth.width as u32,
            got_height: depth.height as u32,
        });
    }
    Ok(())
}
