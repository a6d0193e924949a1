//! Convex planar polygons and plane splitting.

use glam::{DQuat, DVec3};

use super::plane::{BACK, COPLANAR, EPSILON, FRONT, Plane, SPANNING};

/// Squared distance below which two vertices are merged.
const MERGE_DISTANCE_SQ: f64 = 1e-18;

/// A convex planar polygon; vertices wind counter-clockwise seen from the
/// front of `plane`.
#[derive(Debug, Clone)]
pub(crate) struct Polygon {
    pub vertices: Vec<DVec3>,
    pub plane: Plane,
}

impl Polygon {
    /// Polygon from a vertex loop, dropping repeated vertices.
    ///
    /// Returns `None` when fewer than three distinct vertices remain or the
    /// loop has no area.
    pub fn new(vertices: Vec<DVec3>) -> Option<Self> {
        let vertices = dedup_loop(vertices);
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_loop(&vertices)?;
        Some(Self { vertices, plane })
    }

    /// Polygon that keeps a known supporting plane (used for split pieces).
    pub fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    /// Reverse winding and plane orientation.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Rotate by `rotation` about `origin`, carrying the plane along.
    ///
    /// Every face survives, including split slivers too thin to refit.
    pub fn rotated(&self, rotation: DQuat, origin: DVec3) -> Self {
        let vertices: Vec<DVec3> = self
            .vertices
            .iter()
            .map(|v| rotation * (*v - origin) + origin)
            .collect();
        let normal = (rotation * self.plane.normal).normalize();
        let plane = Plane::from_normal_and_point(normal, vertices[0]);
        Self { vertices, plane }
    }

    /// Signed volume contribution of this face (divergence theorem, times 6).
    pub fn signed_volume6(&self) -> f64 {
        let v0 = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|w| v0.dot(w[0].cross(w[1])))
            .sum()
    }

    /// Split this polygon by `plane` into the four csg.js buckets.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on whether they face the same way as `plane`.
    pub fn split(
        &self,
        plane: &Plane,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let types: Vec<u8> = self
            .vertices
            .iter()
            .map(|v| plane.classify_point(*v))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

        match polygon_type {
            COPLANAR => {
                if plane.normal.dot(self.plane.normal) > 0.0 {
                    coplanar_front.push(self.clone());
                } else {
                    coplanar_back.push(self.clone());
                }
            }
            FRONT => front.push(self.clone()),
            BACK => back.push(self.clone()),
            _ => {
                debug_assert_eq!(polygon_type, SPANNING);
                let n = self.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let denom = plane.normal.dot(vj - vi);
                        let t = if denom.abs() > EPSILON * EPSILON {
                            (plane.w - plane.normal.dot(vi)) / denom
                        } else {
                            0.5
                        };
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, self.plane));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, self.plane));
                }
            }
        }
    }
}

fn dedup_loop(vertices: Vec<DVec3>) -> Vec<DVec3> {
    let mut out: Vec<DVec3> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if out
            .last()
            .is_none_or(|last| last.distance_squared(v) > MERGE_DISTANCE_SQ)
        {
            out.push(v);
        }
    }
    while out.len() > 1 && out[0].distance_squared(out[out.len() - 1]) <= MERGE_DISTANCE_SQ {
        out.pop();
    }
    out
}

/// Six outward quads of the axis-aligned box `[min, max]`.
#[cfg(test)]
pub(crate) fn box_polygons(min: DVec3, max: DVec3) -> Vec<Polygon> {
    let c = |x: f64, y: f64, z: f64| DVec3::new(x, y, z);
    let faces = [
        [c(min.x, min.y, min.z), c(min.x, max.y, min.z), c(max.x, max.y, min.z), c(max.x, min.y, min.z)],
        [c(min.x, min.y, max.z), c(max.x, min.y, max.z), c(max.x, max.y, max.z), c(min.x, max.y, max.z)],
        [c(min.x, min.y, min.z), c(max.x, min.y, min.z), c(max.x, min.y, max.z), c(min.x, min.y, max.z)],
        [c(min.x, max.y, min.z), c(min.x, max.y, max.z), c(max.x, max.y, max.z), c(max.x, max.y, min.z)],
        [c(min.x, min.y, min.z), c(min.x, min.y, max.z), c(min.x, max.y, max.z), c(min.x, max.y, min.z)],
        [c(max.x, min.y, min.z), c(max.x, max.y, min.z), c(max.x, max.y, max.z), c(max.x, min.y, max.z)],
    ];
    faces
        .into_iter()
        .filter_map(|f| Polygon::new(f.to_vec()))
        .collect()
}
