//! Oriented planes with point classification.

use glam::DVec3;

/// Distance tolerance for classifying points against a plane (mm).
pub(crate) const EPSILON: f64 = 1e-5;

/// Classification of a point relative to a plane, as bit flags so that a
/// polygon's classification is the OR of its vertices'.
pub(crate) const COPLANAR: u8 = 0;
pub(crate) const FRONT: u8 = 1;
pub(crate) const BACK: u8 = 2;
pub(crate) const SPANNING: u8 = FRONT | BACK;

/// A plane in 3D space: `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Plane {
    /// Unit normal, pointing to the front side.
    pub normal: DVec3,
    /// Distance from origin along the normal.
    pub w: f64,
}

impl Plane {
    /// Plane through `point` with the given unit normal.
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Self {
        Self {
            normal,
            w: normal.dot(point),
        }
    }

    /// Best-fit plane of a vertex loop (Newell's method).
    ///
    /// Returns `None` for loops with no area.
    pub fn from_loop(vertices: &[DVec3]) -> Option<Self> {
        let n = vertices.len();
        if n < 3 {
            return None;
        }
        let mut normal = DVec3::ZERO;
        let mut centroid = DVec3::ZERO;
        for i in 0..n {
            let cur = vertices[i];
            let next = vertices[(i + 1) % n];
            normal.x += (cur.y - next.y) * (cur.z + next.z);
            normal.y += (cur.z - next.z) * (cur.x + next.x);
            normal.z += (cur.x - next.x) * (cur.y + next.y);
            centroid += cur;
        }
        // Twice the loop area; anything this small has no usable orientation.
        if normal.length_squared() < 1e-20 {
            return None;
        }
        let normal = normal.normalize();
        Some(Self::from_normal_and_point(normal, centroid / n as f64))
    }

    /// Signed distance of `point` (positive in front).
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR`.
    pub fn classify_point(&self, point: DVec3) -> u8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Swap front and back.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_loop_plane_follows_winding() {
        let square = [
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(1.0, 0.0, 2.0),
            DVec3::new(1.0, 1.0, 2.0),
            DVec3::new(0.0, 1.0, 2.0),
        ];
        let plane = Plane::from_loop(&square).unwrap();
        assert_relative_eq!(plane.normal.z, 1.0);
        assert_relative_eq!(plane.w, 2.0);
    }

    #[test]
    fn test_degenerate_loop_has_no_plane() {
        let line = [DVec3::ZERO, DVec3::X, DVec3::X * 2.0];
        assert!(Plane::from_loop(&line).is_none());
    }

    #[test]
    fn test_classify_and_flip() {
        let mut plane = Plane::from_normal_and_point(DVec3::Z, DVec3::ZERO);
        assert_eq!(plane.classify_point(DVec3::Z), FRONT);
        assert_eq!(plane.classify_point(-DVec3::Z), BACK);
        assert_eq!(plane.classify_point(DVec3::X * 1e-7), COPLANAR);
        plane.flip();
        assert_eq!(plane.classify_point(DVec3::Z), BACK);
    }
}
