//! Mesh CAD Kernel Backend
//!
//! Pure Rust polygon kernel. Solids are closed sets of convex planar
//! polygons; booleans run on BSP trees.

mod body;
mod bsp;
mod plane;
mod polygon;
mod sweep;

use glam::{DQuat, DVec3};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    Axis3D, BooleanType, CadError, CadKernel, CadResult, Solid, SolidOps, TessellatedMesh, Wire2D,
};
use crate::sketch::SketchPlane;
use body::Body;
use sweep::{Section, profile_points, sweep};

/// Polygon-mesh CAD kernel
#[derive(Default)]
pub struct MeshKernel {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, Arc<Body>>>,
}

impl MeshKernel {
    /// Create a new mesh kernel
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a body and return a Solid reference
    fn store_solid(&self, body: Body) -> Solid {
        let id = Uuid::new_v4();
        self.solids.lock().insert(id, Arc::new(body));
        Solid::new(id)
    }

    /// Get a stored body by handle
    fn get_solid(&self, solid: &Solid) -> CadResult<Arc<Body>> {
        self.solids
            .lock()
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    /// Enclosed volume of a stored solid
    pub fn volume(&self, solid: &Solid) -> CadResult<f64> {
        Ok(self.get_solid(solid)?.volume())
    }

    /// Axis-aligned bounds of a stored solid as `(min, max)`
    pub fn bounds(&self, solid: &Solid) -> CadResult<(DVec3, DVec3)> {
        let body = self.get_solid(solid)?;
        Ok((body.min, body.max))
    }

    /// Number of solids currently stored
    pub fn solid_count(&self) -> usize {
        self.solids.lock().len()
    }
}

impl SolidOps for MeshKernel {
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let body_a = self.get_solid(a)?;
        let body_b = self.get_solid(b)?;
        tracing::trace!(
            "Boolean {:?}: {} x {} polygons",
            op,
            body_a.polygons.len(),
            body_b.polygons.len()
        );

        let result = match op {
            BooleanType::Union => body_a.union(&body_b),
            BooleanType::Subtract => body_a.difference(&body_b),
            BooleanType::Intersect => body_a.intersection(&body_b),
        };
        if result.is_empty() {
            return Err(CadError::DegenerateResult(format!(
                "{:?} of {} and {} left no material",
                op, a.id, b.id
            )));
        }
        Ok(self.store_solid(result))
    }

    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid> {
        let body = self.get_solid(solid)?;
        Ok(self.store_solid(body.translated(offset)))
    }

    fn rotate(&self, solid: &Solid, axis: &Axis3D, angle: f64) -> CadResult<Solid> {
        if axis.direction.length_squared() < 0.5 {
            return Err(CadError::OperationFailed("rotation axis has no direction".into()));
        }
        let body = self.get_solid(solid)?;
        Ok(self.store_solid(body.rotated(axis.origin, axis.direction, angle)))
    }
}

impl CadKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        if size.cmple(DVec3::ZERO).any() {
            return Err(CadError::InvalidProfile(format!("box size must be positive: {size}")));
        }
        let plane = SketchPlane::xy()
            .centered_at(center.truncate())
            .offset(center.z - size.z / 2.0);
        let profile = Wire2D::rectangle(glam::DVec2::ZERO, size.x, size.y);
        self.extrude(&profile, &plane, size.z)
    }

    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
        segments: u32,
    ) -> CadResult<Solid> {
        if radius <= 0.0 || height <= 0.0 {
            return Err(CadError::InvalidProfile(format!(
                "cylinder needs positive radius and height, got r={radius} h={height}"
            )));
        }
        let axis = axis.normalize_or_zero();
        let plane = SketchPlane::from_normal(center - axis * (height / 2.0), axis);
        let profile = Wire2D::circle(glam::DVec2::ZERO, radius, segments);
        self.extrude(&profile, &plane, height)
    }

    fn extrude(&self, profile: &Wire2D, plane: &SketchPlane, distance: f64) -> CadResult<Solid> {
        if distance.abs() < 1e-12 {
            return Err(CadError::InvalidProfile("extrusion distance is zero".into()));
        }
        let points = profile_points(profile)?;
        let sections: Vec<Section> = [0.0, distance]
            .into_iter()
            .map(|d| {
                let offset = plane.normal * d;
                Section::new(&points, |p| plane.to_world(p) + offset)
            })
            .collect();
        Ok(self.store_solid(sweep(&sections, false)?))
    }

    fn loft(&self, sections: &[(Wire2D, SketchPlane)]) -> CadResult<Solid> {
        if sections.len() < 2 {
            return Err(CadError::InvalidProfile("loft needs at least two sections".into()));
        }
        let rings = sections
            .iter()
            .map(|(wire, plane)| {
                let points = profile_points(wire)?;
                Ok(Section::new(&points, |p| plane.to_world(p)))
            })
            .collect::<CadResult<Vec<_>>>()?;
        Ok(self.store_solid(sweep(&rings, false)?))
    }

    fn revolve(
        &self,
        profile: &Wire2D,
        plane: &SketchPlane,
        axis: &Axis3D,
        angle: f64,
        segments: u32,
    ) -> CadResult<Solid> {
        if angle.abs() < 1e-12 {
            return Err(CadError::InvalidProfile("revolve angle is zero".into()));
        }
        let points = profile_points(profile)?;
        let full_turn = angle.abs() >= std::f64::consts::TAU - 1e-9;
        let steps = ((segments.max(3) as f64) * angle.abs() / std::f64::consts::TAU)
            .ceil()
            .max(1.0) as u32;

        let ring_count = if full_turn { steps } else { steps + 1 };
        let sections: Vec<Section> = (0..ring_count)
            .map(|k| {
                let rotation =
                    DQuat::from_axis_angle(axis.direction, angle * k as f64 / steps as f64);
                Section::new(&points, |p| {
                    rotation * (plane.to_world(p) - axis.origin) + axis.origin
                })
            })
            .collect();
        Ok(self.store_solid(sweep(&sections, full_turn)?))
    }

    fn twist_extrude(
        &self,
        profile: &Wire2D,
        plane: &SketchPlane,
        axis: &Axis3D,
        distance: f64,
        angle: f64,
        steps: u32,
    ) -> CadResult<Solid> {
        if distance.abs() < 1e-12 && angle.abs() < 1e-12 {
            return Err(CadError::InvalidProfile("twist extrusion does not move".into()));
        }
        let points = profile_points(profile)?;
        let steps = steps.max(1);
        let sections: Vec<Section> = (0..=steps)
            .map(|k| {
                let t = k as f64 / steps as f64;
                let rotation = DQuat::from_axis_angle(axis.direction, angle * t);
                let lift = axis.direction * (distance * t);
                Section::new(&points, |p| {
                    rotation * (plane.to_world(p) - axis.origin) + axis.origin + lift
                })
            })
            .collect();
        Ok(self.store_solid(sweep(&sections, false)?))
    }

    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh> {
        Ok(self.get_solid(solid)?.tessellate())
    }
}
