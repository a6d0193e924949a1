//! Sketch planes
//!
//! A [`SketchPlane`] places 2D profiles in 3D space. The named planes follow
//! the usual CAD workplane conventions (`xz` looks along -Y so that its local
//! Y axis points up).

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A plane on which sketches are drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SketchPlane {
    /// Origin of the plane in 3D space
    pub origin: DVec3,
    /// Normal vector of the plane
    pub normal: DVec3,
    /// X axis of the plane (for 2D to 3D mapping)
    pub x_axis: DVec3,
    /// Y axis of the plane (for 2D to 3D mapping)
    pub y_axis: DVec3,
}

impl Default for SketchPlane {
    fn default() -> Self {
        Self::xy()
    }
}

impl SketchPlane {
    /// Plane through `origin` with the given normal and in-plane X direction.
    ///
    /// The X direction is projected into the plane; Y completes a
    /// right-handed frame (`x × y = normal`).
    pub fn new(origin: DVec3, normal: DVec3, x_axis: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        let x_axis = (x_axis - normal * x_axis.dot(normal))
            .try_normalize()
            .unwrap_or_else(|| normal.any_orthonormal_vector());
        let y_axis = normal.cross(x_axis);
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    /// Plane through `origin` with an arbitrary in-plane frame
    pub fn from_normal(origin: DVec3, normal: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self::new(origin, normal, normal.any_orthonormal_vector())
    }

    /// XY plane at origin (normal +Z)
    pub fn xy() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z, DVec3::X)
    }

    /// XZ plane at origin (normal -Y, local Y is world Z)
    pub fn xz() -> Self {
        Self::new(DVec3::ZERO, DVec3::NEG_Y, DVec3::X)
    }

    /// YZ plane at origin (normal +X)
    pub fn yz() -> Self {
        Self::new(DVec3::ZERO, DVec3::X, DVec3::Y)
    }

    /// Top plane at origin (normal +Y, local Y is world -Z)
    pub fn top() -> Self {
        Self::new(DVec3::ZERO, DVec3::Y, DVec3::X)
    }

    /// Copy moved `distance` along the normal
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            ..*self
        }
    }

    /// Copy whose origin is moved to the plane point `local`
    pub fn centered_at(&self, local: DVec2) -> Self {
        Self {
            origin: self.to_world(local),
            ..*self
        }
    }

    /// Map a point in plane coordinates to world space
    pub fn to_world(&self, p: DVec2) -> DVec3 {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_right_handed(plane: &SketchPlane) {
        let n = plane.x_axis.cross(plane.y_axis);
        assert_relative_eq!(n.x, plane.normal.x, epsilon = 1e-12);
        assert_relative_eq!(n.y, plane.normal.y, epsilon = 1e-12);
        assert_relative_eq!(n.z, plane.normal.z, epsilon = 1e-12);
    }

    #[test]
    fn test_named_planes_are_right_handed() {
        for plane in [
            SketchPlane::xy(),
            SketchPlane::xz(),
            SketchPlane::yz(),
            SketchPlane::top(),
        ] {
            assert_right_handed(&plane);
        }
    }

    #[test]
    fn test_xz_local_y_points_up() {
        let plane = SketchPlane::xz();
        assert_eq!(plane.y_axis, DVec3::Z);
        assert_eq!(plane.to_world(DVec2::new(2.0, 3.0)), DVec3::new(2.0, 0.0, 3.0));
    }

    #[test]
    fn test_offset_moves_along_normal() {
        let plane = SketchPlane::xz().offset(-1.5);
        assert_eq!(plane.origin, DVec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_from_normal_is_orthonormal() {
        let plane = SketchPlane::from_normal(DVec3::ONE, DVec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(plane.x_axis.dot(plane.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plane.x_axis.length(), 1.0, epsilon = 1e-12);
        assert_right_handed(&plane);
    }
}
