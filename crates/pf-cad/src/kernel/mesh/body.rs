//! Polygon-soup bodies and the csg.js boolean algorithm.
//!
//! - Union: `a.clip_to(b); b.clip_to(a); b.invert(); b.clip_to(a); b.invert();` combine
//! - Difference: invert `a`, union, invert the result
//! - Intersection: `a.invert(); b.clip_to(a); b.invert(); a.clip_to(b); b.clip_to(a);` combine, invert

use glam::{DQuat, DVec3};

use super::bsp::BspNode;
use super::plane::EPSILON;
use super::polygon::Polygon;
use crate::kernel::TessellatedMesh;

/// A closed solid stored as outward-facing convex polygons.
#[derive(Debug, Clone, Default)]
pub(crate) struct Body {
    pub polygons: Vec<Polygon>,
    pub min: DVec3,
    pub max: DVec3,
}

impl Body {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for v in polygons.iter().flat_map(|p| p.vertices.iter()) {
            min = min.min(*v);
            max = max.max(*v);
        }
        if polygons.is_empty() {
            min = DVec3::ZERO;
            max = DVec3::ZERO;
        }
        Self { polygons, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn volume(&self) -> f64 {
        self.polygons.iter().map(Polygon::signed_volume6).sum::<f64>() / 6.0
    }

    /// Whether the bounding boxes are separated by more than the tolerance.
    fn disjoint(&self, other: &Body) -> bool {
        (self.max.cmplt(other.min - EPSILON)).any() || (other.max.cmplt(self.min - EPSILON)).any()
    }

    /// Flip every face when the soup came out inside-out.
    pub fn oriented_outward(mut self) -> Self {
        if self.volume() < 0.0 {
            for polygon in &mut self.polygons {
                polygon.flip();
            }
        }
        self
    }

    pub fn union(&self, other: &Body) -> Body {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() || self.disjoint(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend(other.polygons.iter().cloned());
            return Body::from_polygons(polygons);
        }

        let mut a = BspNode::new(self.polygons.clone());
        let mut b = BspNode::new(other.polygons.clone());
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        Body::from_polygons(a.all_polygons())
    }

    pub fn difference(&self, other: &Body) -> Body {
        if self.is_empty() || other.is_empty() || self.disjoint(other) {
            return self.clone();
        }

        let mut a = BspNode::new(self.polygons.clone());
        let mut b = BspNode::new(other.polygons.clone());
        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        a.invert();
        Body::from_polygons(a.all_polygons())
    }

    pub fn intersection(&self, other: &Body) -> Body {
        if self.is_empty() || other.is_empty() || self.disjoint(other) {
            return Body::default();
        }

        let mut a = BspNode::new(self.polygons.clone());
        let mut b = BspNode::new(other.polygons.clone());
        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(b.all_polygons());
        a.invert();
        Body::from_polygons(a.all_polygons())
    }

    pub fn translated(&self, offset: DVec3) -> Body {
        let polygons = self
            .polygons
            .iter()
            .map(|p| {
                let mut moved = p.clone();
                for v in &mut moved.vertices {
                    *v += offset;
                }
                moved.plane.w += moved.plane.normal.dot(offset);
                moved
            })
            .collect();
        Body {
            polygons,
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Rotate about the line through `origin` along unit `direction`.
    pub fn rotated(&self, origin: DVec3, direction: DVec3, angle: f64) -> Body {
        let rotation = DQuat::from_axis_angle(direction, angle);
        let polygons = self
            .polygons
            .iter()
            .map(|p| p.rotated(rotation, origin))
            .collect();
        Body::from_polygons(polygons)
    }

    /// Fan-triangulate every face into an indexed mesh with flat normals.
    pub fn tessellate(&self) -> TessellatedMesh {
        let mut mesh = TessellatedMesh::new();
        for polygon in &self.polygons {
            let base = mesh.vertices.len() as u32;
            let normal = polygon.plane.normal.as_vec3().to_array();
            for v in &polygon.vertices {
                mesh.vertices.push(v.as_vec3().to_array());
                mesh.normals.push(normal);
            }
            for i in 1..polygon.vertices.len() as u32 - 1 {
                mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::mesh::polygon::box_polygons;
    use approx::assert_relative_eq;

    fn cube(min: DVec3, size: f64) -> Body {
        Body::from_polygons(box_polygons(min, min + DVec3::splat(size)))
    }

    #[test]
    fn test_overlapping_union_volume() {
        let a = cube(DVec3::ZERO, 2.0);
        let b = cube(DVec3::ONE, 2.0);
        assert_relative_eq!(a.union(&b).volume(), 15.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_and_intersection_volume() {
        let a = cube(DVec3::ZERO, 2.0);
        let b = cube(DVec3::ONE, 2.0);
        assert_relative_eq!(a.difference(&b).volume(), 7.0, epsilon = 1e-6);
        assert_relative_eq!(a.intersection(&b).volume(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_disjoint_shortcuts() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::splat(5.0), 1.0);
        assert_relative_eq!(a.union(&b).volume(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(a.difference(&b).volume(), 1.0, epsilon = 1e-9);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_subtracting_a_superset_leaves_nothing() {
        let small = cube(DVec3::ONE, 1.0);
        let big = cube(DVec3::ZERO, 4.0);
        assert!(small.difference(&big).is_empty());
    }

    #[test]
    fn test_transforms_keep_volume() {
        let a = cube(DVec3::ZERO, 2.0);
        let moved = a.translated(DVec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(moved.volume(), 8.0, epsilon = 1e-9);
        assert_eq!(moved.min, DVec3::new(1.0, 2.0, 3.0));

        let turned = a.rotated(DVec3::ZERO, DVec3::Z, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(turned.volume(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(turned.min.x, -2.0, epsilon = 1e-9);
        assert_relative_eq!(turned.max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_keeps_sliver_faces() {
        let mut body = cube(DVec3::ZERO, 2.0);
        // Thin split piece lying in the cube's bottom face plane
        let bottom = body
            .polygons
            .iter()
            .find(|p| p.plane.normal.z < -0.5)
            .map(|p| p.plane)
            .unwrap();
        let sliver = Polygon::with_plane(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1e-10, 2.0, 0.0),
                DVec3::new(0.0, 2.0, 0.0),
            ],
            bottom,
        );
        body.polygons.push(sliver);
        let count = body.polygons.len();

        let turned = body.rotated(DVec3::ONE, DVec3::X, std::f64::consts::PI);
        assert_eq!(turned.polygons.len(), count);
        let flipped = turned.polygons.last().unwrap();
        assert_relative_eq!(flipped.plane.normal.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(flipped.plane.w, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_oriented_outward_fixes_inside_out_soup() {
        let mut inside_out = cube(DVec3::ZERO, 1.0);
        for p in &mut inside_out.polygons {
            p.flip();
        }
        assert!(inside_out.volume() < 0.0);
        assert_relative_eq!(inside_out.oriented_outward().volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tessellate_fans_faces() {
        let mesh = cube(DVec3::ZERO, 1.0).tessellate();
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-6);
    }
}
