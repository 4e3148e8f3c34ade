//! JSON configuration and report helpers.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{TrackError, TrackerParams, TrajectorySnapshot, WindowFlush};

#[derive(thiserror::Error, Debug)]
pub enum TrackIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Tracker configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tracker: TrackerParams,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl TrackerConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("trajectory_report.json"))
    }

    /// Validated tracker parameters.
    pub fn build_params(&self) -> Result<TrackerParams, TrackError> {
        self.tracker.validate()?;
        Ok(self.tracker.clone())
    }
}

/// Flushed windows plus whatever was still accumulating at the end of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingReport {
    pub source: String,
    pub params: TrackerParams,
    pub frames: usize,
    pub flushes: Vec<WindowFlush>,
    #[serde(default)]
    pub remaining: TrajectorySnapshot,
    #[serde(default)]
    pub error: Option<String>,
}

impl TrackingReport {
    pub fn new(source: impl Into<String>, params: TrackerParams) -> Self {
        Self {
            source: source.into(),
            params,
            ..Self::default()
        }
    }

    /// Total samples across flushed windows and the remainder.
    pub fn sample_count(&self) -> usize {
        self.flushes
            .iter()
            .map(|f| f.trajectories.sample_count())
            .sum::<usize>()
            + self.remaining.sample_count()
    }

    /// Record the error that ended the run.
    pub fn set_error(&mut self, err: impl fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackIoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RepresentativePixel;
    use marker_trajectory_core::TrajectorySample;

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tracker.json");
        let cfg = TrackerConfig {
            tracker: TrackerParams {
                pixel: RepresentativePixel::Centroid,
                ..TrackerParams::with_interval(5.0)
            },
            output_path: Some("out/report.json".to_string()),
        };
        cfg.write_json(&path).expect("write config");
        let loaded = TrackerConfig::load_json(&path).expect("load config");
        assert_eq!(loaded.tracker, cfg.tracker);
        assert_eq!(loaded.output_path(), PathBuf::from("out/report.json"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: TrackerConfig = serde_json::from_str("{}").expect("parse config");
        assert_eq!(cfg.output_path(), PathBuf::from("trajectory_report.json"));
        assert_eq!(cfg.build_params().expect("params"), TrackerParams::default());
    }

    #[test]
    fn invalid_interval_is_a_config_error() {
        let cfg: TrackerConfig =
            serde_json::from_str(r#"{"tracker":{"window":{"enabled":true,"interval_secs":-1.0}}}"#)
                .expect("parse config");
        assert!(cfg.build_params().is_err());
    }

    #[test]
    fn report_is_written_into_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/report.json");
        let mut report = TrackingReport::new("session.json", TrackerParams::default());
        let mut remaining = TrajectorySnapshot::default();
        remaining.trajectories.insert(
            3,
            vec![TrajectorySample {
                timestamp: 0.5,
                x: 0.1,
                y: 0.2,
                z: 1.0,
            }],
        );
        report.remaining = remaining;
        report.frames = 1;
        report.write_json(&path).expect("write report");

        let loaded = TrackingReport::load_json(&path).expect("load report");
        assert_eq!(loaded.frames, 1);
        assert_eq!(loaded.sample_count(), 1);
        assert_eq!(loaded.remaining, report.remaining);
    }

    #[test]
    fn failed_run_keeps_its_error_in_the_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let mut report = TrackingReport::new("session.json", TrackerParams::default());
        report.set_error(TrackError::InvalidParams("bad depth frame".to_string()));
        report.write_json(&path).expect("write report");

        let loaded = TrackingReport::load_json(&path).expect("load report");
        let error = loaded.error.as_deref().expect("error recorded");
        assert!(error.contains("bad depth frame"), "{error}");
        assert_eq!(loaded.sample_count(), 0);
    }
}
