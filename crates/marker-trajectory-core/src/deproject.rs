//! Pixel + depth to camera-frame point.

use nalgebra::{Point2, Point3};

use crate::{CameraIntrinsics, DepthAccessor, DistortionModel};

/// Inverse pinhole projection of `pixel` at `depth` meters.
///
/// Intrinsics are expected to be rectified. For
/// [`DistortionModel::InverseBrownConrady`] the closed-form correction is
/// applied to the normalized coordinates; no iterative undistortion is done
/// for any model.
pub fn deproject_pixel_to_point(
    intrinsics: &CameraIntrinsics,
    pixel: Point2<f32>,
    depth: f32,
) -> Point3<f32> {
    let mut x = (pixel.x - intrinsics.cx) / intrinsics.fx;
    let mut y = (pixel.y - intrinsics.cy) / intrinsics.fy;

    if intrinsics.model == DistortionModel::InverseBrownConrady {
        let [k1, k2, p1, p2, k3] = intrinsics.coeffs;
        let r2 = x * x + y * y;
        let f = 1.0 + k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2;
        let ux = x * f + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
        let uy = y * f + 2.0 * p2 * x * y + p1 * (r2 + 2.0 * y * y);
        x = ux;
        y = uy;
    }

    Point3::new(depth * x, depth * y, depth)
}

/// Resolve an integer pixel to a 3D point using the frame's depth.
///
/// Returns `None` when the depth at `pixel` is not positive; that is an
/// expected outcome for occluded or out-of-range markers, not an error.
#[inline]
pub fn deproject_pixel<D>(
    pixel: Point2<i32>,
    depth: &D,
    intrinsics: &CameraIntrinsics,
) -> Option<Point3<f32>>
where
    D: DepthAccessor + ?Sized,
{
    let z = depth.distance(pixel.x, pixel.y);
    if z.is_nan() || z <= 0.0 {
        return None;
    }
    Some(deproject_pixel_to_point(
        intrinsics,
        Point2::new(pixel.x as f32, pixel.y as f32),
        z,
    ))
}
