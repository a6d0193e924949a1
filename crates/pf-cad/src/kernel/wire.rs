//! Closed 2D profiles used by extrusion, loft, revolve and twist operations.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Points closer than this are treated as one.
const POINT_EPSILON: f64 = 1e-9;

/// A 2D wire (closed loop of edges) for extrusion profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire2D {
    /// Points defining the wire (in order, last joins first)
    pub points: Vec<DVec2>,
}

impl Wire2D {
    /// Create a new wire from points
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// Create a rectangle wire
    pub fn rectangle(center: DVec2, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(vec![
            center + DVec2::new(-hw, -hh),
            center + DVec2::new(hw, -hh),
            center + DVec2::new(hw, hh),
            center + DVec2::new(-hw, hh),
        ])
    }

    /// Create a circle wire (approximated with segments)
    pub fn circle(center: DVec2, radius: f64, segments: u32) -> Self {
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let angle = (i as f64 / segments as f64) * TAU;
                center + DVec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::new(points)
    }

    /// Rectangle with the same corner radius on all four corners
    pub fn rounded_rectangle(
        center: DVec2,
        width: f64,
        height: f64,
        radius: f64,
        segments: u32,
    ) -> Self {
        Self::rounded_rectangle_corners(center, width, height, [radius; 4], segments)
    }

    /// Rectangle with individual corner radii.
    ///
    /// Radii are ordered bottom-left, bottom-right, top-right, top-left and
    /// clamped to `[0, min(width, height) / 2]`. The point count depends only
    /// on `segments`, so wires built with different radii can be lofted.
    pub fn rounded_rectangle_corners(
        center: DVec2,
        width: f64,
        height: f64,
        radii: [f64; 4],
        segments: u32,
    ) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let max_radius = hw.min(hh).max(0.0);
        let per_corner = (segments / 4).max(1);
        // Corner centres sit at the inset corners; arcs sweep a quarter turn each.
        let corners = [
            (DVec2::new(-hw, -hh), DVec2::new(1.0, 1.0), 2.0 * FRAC_PI_2),
            (DVec2::new(hw, -hh), DVec2::new(-1.0, 1.0), 3.0 * FRAC_PI_2),
            (DVec2::new(hw, hh), DVec2::new(-1.0, -1.0), 0.0),
            (DVec2::new(-hw, hh), DVec2::new(1.0, -1.0), FRAC_PI_2),
        ];

        let mut points = Vec::with_capacity(4 * (per_corner as usize + 1));
        for ((corner, inward, start), radius) in corners.into_iter().zip(radii) {
            let r = radius.clamp(0.0, max_radius);
            let arc_center = center + corner + inward * r;
            for i in 0..=per_corner {
                let angle = start + FRAC_PI_2 * i as f64 / per_corner as f64;
                points.push(arc_center + DVec2::new(angle.cos(), angle.sin()) * r);
            }
        }
        Self::new(points)
    }

    /// Rectangle with all four corners cut at 45 degrees by `chamfer`
    ///
    /// The chamfer is clamped to half the shorter side.
    pub fn chamfered_rectangle(center: DVec2, width: f64, height: f64, chamfer: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let c = chamfer.clamp(0.0, hw.min(hh));
        Self::new(
            [
                (-hw + c, -hh),
                (hw - c, -hh),
                (hw, -hh + c),
                (hw, hh - c),
                (hw - c, hh),
                (-hw + c, hh),
                (-hw, hh - c),
                (-hw, -hh + c),
            ]
            .into_iter()
            .map(|(x, y)| center + DVec2::new(x, y))
            .collect(),
        )
    }

    /// Stadium joining two end centres with semicircular caps of `width / 2`
    pub fn stadium(start: DVec2, end: DVec2, width: f64, segments: u32) -> Self {
        let r = width / 2.0;
        let dir = (end - start).try_normalize().unwrap_or(DVec2::X);
        let heading = dir.y.atan2(dir.x);
        let per_cap = (segments / 2).max(2);

        let mut points = Vec::with_capacity(2 * (per_cap as usize + 1));
        for (cap_center, offset) in [(end, -FRAC_PI_2), (start, FRAC_PI_2)] {
            for i in 0..=per_cap {
                let angle = heading + offset + std::f64::consts::PI * i as f64 / per_cap as f64;
                points.push(cap_center + DVec2::new(angle.cos(), angle.sin()) * r);
            }
        }
        Self::new(points)
    }

    /// Slot of overall `length` and `width`, rotated by `angle` degrees
    pub fn slot(center: DVec2, length: f64, width: f64, angle: f64, segments: u32) -> Self {
        let half = ((length - width) / 2.0).max(0.0);
        let dir = DVec2::from_angle(angle.to_radians());
        Self::stadium(center - dir * half, center + dir * half, width, segments)
    }

    /// Signed area (positive for counter-clockwise loops)
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Whether the loop winds counter-clockwise
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same loop, wound counter-clockwise
    pub fn to_ccw(&self) -> Self {
        let mut wire = self.clone();
        if !wire.is_ccw() {
            wire.points.reverse();
        }
        wire
    }

    /// Copy shifted by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.points.iter().map(|p| *p + offset).collect())
    }

    /// Whether the loop is convex, ignoring repeated points
    pub fn is_convex(&self) -> bool {
        let pts = dedup_loop(&self.points);
        if pts.len() < 3 {
            return false;
        }
        let n = pts.len();
        let mut sign = 0.0;
        for i in 0..n {
            let a = pts[i];
            let b = pts[(i + 1) % n];
            let c = pts[(i + 2) % n];
            let turn = (b - a).perp_dot(c - b);
            if turn.abs() <= POINT_EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = turn.signum();
            } else if turn.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }
}

/// Shoelace area of a closed loop
pub(crate) fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

/// Drop consecutive duplicates, including the wrap from last to first.
pub(crate) fn dedup_loop(points: &[DVec2]) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(points.len());
    for p in points {
        if out
            .last()
            .is_none_or(|last| last.distance_squared(*p) > POINT_EPSILON * POINT_EPSILON)
        {
            out.push(*p);
        }
    }
    while out.len() > 1
        && out[0].distance_squared(out[out.len() - 1]) <= POINT_EPSILON * POINT_EPSILON
    {
        out.pop();
    }
    out
}

/// Ear-clipping triangulation of a simple polygon.
///
/// Returns index triples into `points`, each wound counter-clockwise. Loops
/// the clipper cannot finish (self-intersecting input) fall back to a fan
/// over the remaining vertices.
pub fn triangulate(points: &[DVec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let a = remaining[(i + m - 1) % m];
            let b = remaining[i];
            let c = remaining[(i + 1) % m];
            is_ear(points, &remaining, a, b, c)
        });
        let Some(i) = ear else { break };
        triangles.push([
            remaining[(i + m - 1) % m],
            remaining[i],
            remaining[(i + 1) % m],
        ]);
        remaining.remove(i);
    }

    for i in 1..remaining.len().saturating_sub(1) {
        triangles.push([remaining[0], remaining[i], remaining[i + 1]]);
    }
    triangles
}

fn is_ear(points: &[DVec2], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (points[a], points[b], points[c]);
    if (pb - pa).perp_dot(pc - pb) <= POINT_EPSILON {
        return false;
    }
    remaining
        .iter()
        .filter(|&&k| k != a && k != b && k != c)
        .all(|&k| !point_in_triangle(points[k], pa, pb, pc))
}

fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= -POINT_EPSILON && d2 >= -POINT_EPSILON && d3 >= -POINT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangulated_area(points: &[DVec2]) -> f64 {
        triangulate(points)
            .iter()
            .map(|[a, b, c]| signed_area(&[points[*a], points[*b], points[*c]]))
            .sum()
    }

    #[test]
    fn test_rectangle_area_and_winding() {
        let wire = Wire2D::rectangle(DVec2::new(1.0, 2.0), 4.0, 3.0);
        assert!(wire.is_ccw());
        assert_relative_eq!(wire.signed_area(), 12.0);
        assert!(wire.is_convex());
    }

    #[test]
    fn test_circle_is_ccw() {
        let wire = Wire2D::circle(DVec2::ZERO, 2.0, 32);
        assert_eq!(wire.points.len(), 32);
        assert!(wire.is_ccw());
        assert!(wire.signed_area() < std::f64::consts::PI * 4.0);
    }

    #[test]
    fn test_rounded_rectangle_point_count_is_radius_independent() {
        let sharp = Wire2D::rounded_rectangle(DVec2::ZERO, 10.0, 6.0, 0.0, 16);
        let round = Wire2D::rounded_rectangle(DVec2::ZERO, 10.0, 6.0, 2.0, 16);
        assert_eq!(sharp.points.len(), round.points.len());
        assert_relative_eq!(sharp.signed_area(), 60.0, epsilon = 1e-9);
        assert!(round.signed_area() < 60.0);
        assert!(round.is_ccw());
        assert!(round.is_convex());
    }

    #[test]
    fn test_chamfered_rectangle_area() {
        let wire = Wire2D::chamfered_rectangle(DVec2::new(3.0, 0.0), 10.0, 20.0, 2.0);
        assert_eq!(wire.points.len(), 8);
        assert!(wire.is_ccw());
        assert!(wire.is_convex());
        assert_relative_eq!(wire.signed_area(), 200.0 - 4.0 * 2.0, epsilon = 1e-9);

        // Clamped so the short sides meet in a point
        let pointed = Wire2D::chamfered_rectangle(DVec2::ZERO, 4.0, 10.0, 5.0);
        assert_relative_eq!(pointed.signed_area(), 40.0 - 4.0 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slot_extent() {
        let wire = Wire2D::slot(DVec2::ZERO, 10.0, 2.0, 0.0, 32);
        let max_x = wire.points.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_x = wire.points.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert_relative_eq!(max_x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(min_x, -5.0, epsilon = 1e-9);
        assert!(wire.is_ccw());
    }

    #[test]
    fn test_triangulate_concave_polygon() {
        // L shape
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 4.0),
            DVec2::new(0.0, 4.0),
        ];
        assert!(!Wire2D::new(points.clone()).is_convex());
        let triangles = triangulate(&points);
        assert_eq!(triangles.len(), 4);
        assert_relative_eq!(triangulated_area(&points), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangulate_clockwise_input() {
        let mut points = Wire2D::rectangle(DVec2::ZERO, 2.0, 2.0).points;
        points.reverse();
        assert_relative_eq!(triangulated_area(&points), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dedup_loop_drops_wraparound_duplicate() {
        let points = vec![
            DVec2::ZERO,
            DVec2::X,
            DVec2::X,
            DVec2::ONE,
            DVec2::ZERO,
        ];
        assert_eq!(dedup_loop(&points).len(), 3);
    }
}
