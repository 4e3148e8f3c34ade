use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Time-stamped marker position in the depth camera frame.
///
/// `timestamp` is in seconds, `x`, `y`, `z` in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub timestamp: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TrajectorySample {
    pub fn new(timestamp: f64, position: Point3<f32>) -> Self {
        Self {
            timestamp,
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }

    #[inline]
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }
}
