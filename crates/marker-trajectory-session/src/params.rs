use serde::{Deserialize, Serialize};

use crate::TrackError;

/// Which pixel of a marker quad is used to sample depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativePixel {
    /// Midpoint of the top-left / bottom-right diagonal.
    #[default]
    DiagonalMidpoint,
    /// Mean of all four corners.
    Centroid,
}

/// Flush window settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowParams {
    /// With `false`, trajectories accumulate until cleared explicitly.
    #[serde(default = "default_window_enabled")]
    pub enabled: bool,
    /// Seconds between flushes.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
}

fn default_window_enabled() -> bool {
    true
}

fn default_interval_secs() -> f64 {
    20.0
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            enabled: default_window_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// Configuration for a [`crate::TrackingSession`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerParams {
    #[serde(default)]
    pub window: WindowParams,
    #[serde(default)]
    pub pixel: RepresentativePixel,
}

impl TrackerParams {
    pub fn with_interval(interval_secs: f64) -> Self {
        Self {
            window: WindowParams {
                enabled: true,
                interval_secs,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        let interval = self.window.interval_secs;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(TrackError::InvalidParams(format!(
                "window.interval_secs must be a positive number, got {interval}"
            )));
        }
        Ok(())
    }
}
