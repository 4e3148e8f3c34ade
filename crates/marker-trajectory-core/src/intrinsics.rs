//! Depth sensor projection model.

use serde::{Deserialize, Serialize};

/// Lens distortion model reported by the depth stream profile.
///
/// Coefficients are always `[k1, k2, p1, p2, k3]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionModel {
    /// Rectified image, plain pinhole.
    #[default]
    None,
    /// Closed-form correction applied to normalized coordinates when deprojecting.
    InverseBrownConrady,
    /// Needs iterative undistortion; accepted only with all-zero coefficients.
    BrownConrady,
    /// Fisheye model; accepted only with all-zero coefficients.
    KannalaBrandt4,
}

/// Errors returned by [`CameraIntrinsics::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IntrinsicsError {
    #[error("image size must be non-zero (width={width}, height={height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("focal lengths must be > 0 (fx={fx}, fy={fy})")]
    NonPositiveFocal { fx: f32, fy: f32 },
    #[error("intrinsics field `{field}` is not finite")]
    NonFinite { field: &'static str },
    #[error("distortion model {model:?} requires iterative undistortion")]
    UnsupportedDistortion { model: DistortionModel },
}

/// Pinhole intrinsics of the depth sensor.
///
/// Constant for a session; rebuilt only when the stream profile changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub width: u32,
    pub height: u32,
    /// Focal length in pixels, horizontal.
    pub fx: f32,
    /// Focal length in pixels, vertical.
    pub fy: f32,
    /// Principal point, horizontal.
    pub cx: f32,
    /// Principal point, vertical.
    pub cy: f32,
    #[serde(default)]
    pub model: DistortionModel,
    #[serde(default)]
    pub coeffs: [f32; 5],
}

impl CameraIntrinsics {
    /// Rectified pinhole intrinsics with no distortion.
    pub fn pinhole(width: u32, height: u32, fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
            model: DistortionModel::None,
            coeffs: [0.0; 5],
        }
    }

    /// Check that these intrinsics describe a usable projection.
    ///
    /// A failure here invalidates geometry for every marker of every frame,
    /// so callers treat it as a configuration error.
    pub fn validate(&self) -> Result<(), IntrinsicsError> {
        if self.width == 0 || self.height == 0 {
            return Err(IntrinsicsError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        for (field, value) in [
            ("fx", self.fx),
            ("fy", self.fy),
            ("cx", self.cx),
            ("cy", self.cy),
        ] {
            if !value.is_finite() {
                return Err(IntrinsicsError::NonFinite { field });
            }
        }
        if self.coeffs.iter().any(|c| !c.is_finite()) {
            return Err(IntrinsicsError::NonFinite { field: "coeffs" });
        }
        if self.fx <= 0.0 || self.fy <= 0.0 {
            return Err(IntrinsicsError::NonPositiveFocal {
                fx: self.fx,
                fy: self.fy,
            });
        }
        match self.model {
            DistortionModel::None | DistortionModel::InverseBrownConrady => Ok(()),
            DistortionModel::BrownConrady | DistortionModel::KannalaBrandt4 => {
                if self.has_distortion() {
                    Err(IntrinsicsError::UnsupportedDistortion { model: self.model })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// True if any distortion coefficient is non-zero.
    #[inline]
    pub fn has_distortion(&self) -> bool {
        self.coeffs.iter().any(|&c| c != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d415() -> CameraIntrinsics {
        CameraIntrinsics::pinhole(640, 480, 600.0, 600.0, 320.0, 240.0)
    }

    #[test]
    fn pinhole_intrinsics_are_valid() {
        assert_eq!(d415().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_focal_length() {
        let intr = CameraIntrinsics { fx: 0.0, ..d415() };
        assert!(matches!(
            intr.validate(),
            Err(IntrinsicsError::NonPositiveFocal { .. })
        ));
    }

    #[test]
    fn rejects_nan_principal_point() {
        let intr = CameraIntrinsics {
            cy: f32::NAN,
            ..d415()
        };
        assert_eq!(
            intr.validate(),
            Err(IntrinsicsError::NonFinite { field: "cy" })
        );
    }

    #[test]
    fn rejects_empty_image() {
        let intr = CameraIntrinsics { width: 0, ..d415() };
        assert!(matches!(
            intr.validate(),
            Err(IntrinsicsError::EmptyImage { .. })
        ));
    }

    #[test]
    fn iterative_models_only_pass_without_coefficients() {
        let zeroed = CameraIntrinsics {
            model: DistortionModel::BrownConrady,
            ..d415()
        };
        assert_eq!(zeroed.validate(), Ok(()));

        let distorted = CameraIntrinsics {
            coeffs: [0.1, 0.0, 0.0, 0.0, 0.0],
            ..zeroed
        };
        assert_eq!(
            distorted.validate(),
            Err(IntrinsicsError::UnsupportedDistortion {
                model: DistortionModel::BrownConrady
            })
        );
    }

    #[test]
    fn deserializes_without_distortion_fields() {
        let json = r#"{"width":640,"height":480,"fx":600.0,"fy":600.0,"cx":320.0,"cy":240.0}"#;
        let intr: CameraIntrinsics = serde_json::from_str(json).expect("parse intrinsics");
        assert_eq!(intr, d415());
    }
}
