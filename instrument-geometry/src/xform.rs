use crate::quat::Quat;
use crate::vector::V3;

/// A rigid-body transform built as `translate(center) . rotate(axis, theta)
/// . translate(-center)`. Applying it to a point rotates the point about
/// `center`; applying its rotation part to a stored orientation composes
/// the rotation only.
#[derive(Copy, Clone, Debug)]
pub struct AffineXform {
    rotation: Quat,
    center: V3,
}

impl AffineXform {
    /// Builds the transform that rotates by `theta` radians about `axis`,
    /// pivoting around `center`.
    pub fn new(axis: &V3, theta: f64, center: V3) -> Self {
        AffineXform {
            rotation: Quat::from_axis_angle(axis, theta),
            center,
        }
    }

    /// The rotation part of this transform, used to compose onto a stored
    /// orientation without re-applying the translation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Applies the full affine transform to a point.
    pub fn apply_point(&self, point: &V3) -> V3 {
        let relative = *point - self.center;
        self.rotation.rotate(&relative) + self.center
    }
}
