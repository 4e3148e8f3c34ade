#![cfg(feature = "image")]

use std::path::Path;

use approx::assert_relative_eq;
use image::{ImageBuffer, Luma};
use marker_trajectory::core::{CameraIntrinsics, MarkerObservation};
use marker_trajectory::replay::{replay_recording, RecordedFrame, Recording, ReplayError};
use marker_trajectory::session::{CollectingSink, TrackerParams};
use nalgebra::Point2;

const W: u32 = 64;
const H: u32 = 48;

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics::pinhole(W, H, 60.0, 60.0, 32.0, 24.0)
}

fn write_depth(dir: &Path, name: &str, width: u32, height: u32, raw: u16) {
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, vec![raw; (width * height) as usize])
            .expect("buffer size");
    img.save(dir.join(name)).expect("write depth png");
}

fn marker(id: u32, cx: f32, cy: f32) -> MarkerObservation {
    MarkerObservation::new(
        id,
        [
            Point2::new(cx - 4.0, cy - 4.0),
            Point2::new(cx + 4.0, cy - 4.0),
            Point2::new(cx + 4.0, cy + 4.0),
            Point2::new(cx - 4.0, cy + 4.0),
        ],
    )
}

fn recording(frames: usize, depth_path: &str) -> Recording {
    Recording {
        intrinsics: intrinsics(),
        depth_scale: 0.001,
        frames: (0..frames)
            .map(|i| RecordedFrame {
                timestamp: i as f64,
                depth_path: depth_path.to_string(),
                markers: vec![marker(7, 32.0, 24.0), marker(9, 44.0, 24.0)],
            })
            .collect(),
    }
}

#[test]
fn replays_frames_into_windows() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_depth(dir.path(), "depth.png", W, H, 2000);
    let rec = recording(10, "depth.png");

    let outcome = replay_recording(
        &rec,
        dir.path(),
        TrackerParams::with_interval(4.0),
        CollectingSink::default(),
    )
    .expect("replay");

    assert_eq!(outcome.frames, 10);
    // windows close at t=4 and t=8; t=9 is still accumulating
    let flushes = &outcome.sink.flushes;
    assert_eq!(flushes.len(), 2);
    assert_eq!(flushes[0].trajectories.sample_count(), 2 * 5);
    assert_eq!(flushes[1].trajectories.sample_count(), 2 * 4);
    assert_eq!(outcome.remaining.sample_count(), 2);

    let nine = outcome.remaining.trajectory(9).expect("marker 9");
    assert_relative_eq!(nine[0].x, 12.0 / 60.0 * 2.0, epsilon = 1e-5);
    assert_relative_eq!(nine[0].z, 2.0, epsilon = 1e-6);
}

#[test]
fn zero_depth_frames_produce_no_samples() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_depth(dir.path(), "holes.png", W, H, 0);
    let rec = recording(3, "holes.png");

    let outcome = replay_recording(
        &rec,
        dir.path(),
        TrackerParams::default(),
        CollectingSink::default(),
    )
    .expect("replay");
    assert!(outcome.remaining.is_empty());
    assert!(outcome.summaries.iter().all(|s| s.invalid_depth == 2));
}

#[test]
fn depth_size_must_match_intrinsics() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_depth(dir.path(), "small.png", 32, 24, 1000);
    let rec = recording(1, "small.png");

    let err = replay_recording(
        &rec,
        dir.path(),
        TrackerParams::default(),
        CollectingSink::default(),
    )
    .expect_err("size mismatch");
    assert!(matches!(err, ReplayError::DepthSize { got_width: 32, .. }));
}

#[test]
fn recording_round_trips_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("recording.json");
    let rec = recording(2, "depth.png");
    rec.write_json(&path).expect("write recording");
    let loaded = Recording::load_json(&path).expect("load recording");
    assert_eq!(loaded.intrinsics, rec.intrinsics);
    assert_eq!(loaded.frames.len(), 2);
    assert_eq!(loaded.frames[1].markers, rec.frames[1].markers);
}
