//! Marker detections as delivered by an external detector.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer identity encoded in the marker pattern.
pub type MarkerId = u32;

/// One detected marker in one frame, as reported by the detector.
///
/// Corners are in pixel space, ordered top-left, top-right, bottom-right,
/// bottom-left. The detector contract asks for exactly four corners and an
/// id; [`MarkerObservation::quad`] checks that contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    #[serde(default)]
    pub id: Option<MarkerId>,
    pub corners: Vec<Point2<f32>>,
}

/// Reasons an observation violates the detector contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("marker id missing")]
    MissingId,
    #[error("expected 4 corners, got {got}")]
    CornerCount { got: usize },
    #[error("corner {index} is not finite")]
    NonFiniteCorner { index: usize },
    #[error("pixel ({x}, {y}) outside the {width}x{height} frame")]
    PixelOutOfFrame {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// Validated observation: an id and four pixel corners (TL, TR, BR, BL).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerQuad {
    pub id: MarkerId,
    pub corners: [Point2<f32>; 4],
}

impl MarkerObservation {
    pub fn new(id: MarkerId, corners: [Point2<f32>; 4]) -> Self {
        Self {
            id: Some(id),
            corners: corners.to_vec(),
        }
    }

    /// Validate the detector contract and return the marker quad.
    pub fn quad(&self) -> Result<MarkerQuad, ObservationError> {
        let id = self.id.ok_or(ObservationError::MissingId)?;
        let corners: [Point2<f32>; 4] = self
            .corners
            .as_slice()
            .try_into()
            .map_err(|_| ObservationError::CornerCount {
                got: self.corners.len(),
            })?;
        if let Some(index) = corners
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(ObservationError::NonFiniteCorner { index });
        }
        Ok(MarkerQuad { id, corners })
    }
}

impl MarkerQuad {
    /// Corners truncated to integer pixels.
    pub fn pixel_corners(&self) -> [Point2<i32>; 4] {
        self.corners.map(|c| Point2::new(c.x as i32, c.y as i32))
    }

    /// Integer midpoint of the top-left / bottom-right diagonal.
    pub fn diagonal_midpoint(&self) -> Point2<i32> {
        let [tl, _, br, _] = self.pixel_corners();
        // i64 sums cannot overflow; the truncated mean fits back into i32.
        Point2::new(
            ((i64::from(tl.x) + i64::from(br.x)) / 2) as i32,
            ((i64::from(tl.y) + i64::from(br.y)) / 2) as i32,
        )
    }

    /// Integer centroid of all four corners.
    pub fn centroid(&self) -> Point2<i32> {
        let pts = self.pixel_corners();
        let sx: i64 = pts.iter().map(|p| i64::from(p.x)).sum();
        let sy: i64 = pts.iter().map(|p| i64::from(p.y)).sum();
        Point2::new((sx / 4) as i32, (sy / 4) as i32)
    }
}

/// Check that `pixel` lies on the `width` x `height` grid.
pub fn check_pixel_in_frame(
    pixel: Point2<i32>,
    width: u32,
    height: u32,
) -> Result<(), ObservationError> {
    let inside = pixel.x >= 0
        && pixel.y >= 0
        && i64::from(pixel.x) < i64::from(width)
        && i64::from(pixel.y) < i64::from(height);
    if inside {
        Ok(())
    } else {
        Err(ObservationError::PixelOutOfFrame {
            x: pixel.x,
            y: pixel.y,
            width,
            height,
        })
    }
}
