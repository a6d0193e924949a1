//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.
//! [`SolidOps`] is the narrow surface the feature combinator needs;
//! [`CadKernel`] adds construction and tessellation.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Wire2D;
use crate::sketch::SketchPlane;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Degenerate result: {0}")]
    DegenerateResult(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the CAD kernel
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `i`
    pub fn triangle(&self, i: usize) -> [[f32; 3]; 3] {
        let base = i * 3;
        [
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        ]
    }

    /// Face normal of triangle `i` (taken from its first vertex)
    pub fn triangle_normal(&self, i: usize) -> [f32; 3] {
        self.normals[self.indices[i * 3] as usize]
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Only meaningful for closed, outward-oriented meshes.
    pub fn volume(&self) -> f64 {
        let to_d = |p: [f32; 3]| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64);
        (0..self.triangle_count())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                to_d(a).dot(to_d(b).cross(to_d(c)))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(mut min, mut max), v| {
                for k in 0..3 {
                    min[k] = min[k].min(v[k]);
                    max[k] = max[k].max(v[k]);
                }
                (min, max)
            });
        Some((min, max))
    }
}

/// A 3D solid body.
///
/// Only a handle: the geometry lives in the kernel that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Axis definition for revolve and rotate operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3D {
    /// Origin point of the axis
    pub origin: DVec3,
    /// Direction of the axis (normalized)
    pub direction: DVec3,
}

impl Axis3D {
    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// X axis at origin
    pub fn x() -> Self {
        Self::new(DVec3::ZERO, DVec3::X)
    }

    /// Y axis at origin
    pub fn y() -> Self {
        Self::new(DVec3::ZERO, DVec3::Y)
    }

    /// Z axis at origin
    pub fn z() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z)
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Whole-solid operations: booleans and rigid transforms.
///
/// Every call leaves its inputs untouched and returns a new handle.
pub trait SolidOps {
    /// Perform a boolean operation on two solids
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid>;

    /// Translate a solid by `offset`
    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid>;

    /// Rotate a solid about `axis` by `angle` radians (right-hand rule)
    fn rotate(&self, solid: &Solid, axis: &Axis3D, angle: f64) -> CadResult<Solid>;
}

/// The main CAD kernel trait
///
/// Implementations provide primitive construction, sweeps and tessellation
/// on top of [`SolidOps`].
pub trait CadKernel: SolidOps + Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Create a box primitive
    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid>;

    /// Create a cylinder primitive centred on `center`
    ///
    /// # Arguments
    /// * `axis` - Direction of the cylinder axis
    /// * `segments` - Number of straight edges approximating the circle
    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
        segments: u32,
    ) -> CadResult<Solid>;

    /// Extrude a 2D profile along the plane normal
    ///
    /// A negative `distance` extrudes against the normal.
    fn extrude(&self, profile: &Wire2D, plane: &SketchPlane, distance: f64) -> CadResult<Solid>;

    /// Ruled loft through a sequence of profiles.
    ///
    /// All profiles must have the same number of points; point `i` of one
    /// section is joined to point `i` of the next.
    fn loft(&self, sections: &[(Wire2D, SketchPlane)]) -> CadResult<Solid>;

    /// Revolve a 2D profile around an axis
    ///
    /// # Arguments
    /// * `angle` - The rotation angle in radians; a full turn needs no caps
    /// * `segments` - Number of steps per full turn
    fn revolve(
        &self,
        profile: &Wire2D,
        plane: &SketchPlane,
        axis: &Axis3D,
        angle: f64,
        segments: u32,
    ) -> CadResult<Solid>;

    /// Extrude a profile along `axis` while rotating it about the same axis.
    ///
    /// The profile travels `distance` along the axis direction and turns by
    /// `angle` radians, sampled in `steps` rigid copies. This is how helical
    /// threads are built.
    fn twist_extrude(
        &self,
        profile: &Wire2D,
        plane: &SketchPlane,
        axis: &Axis3D,
        distance: f64,
        angle: f64,
        steps: u32,
    ) -> CadResult<Solid>;

    /// Tessellate a solid into triangles
    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>() -> CadResult<T> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }
}

impl SolidOps for NullKernel {
    fn boolean(&self, _a: &Solid, _b: &Solid, _op: BooleanType) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn translate(&self, _solid: &Solid, _offset: DVec3) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn rotate(&self, _solid: &Solid, _axis: &Axis3D, _angle: f64) -> CadResult<Solid> {
        Self::unavailable()
    }
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_box(&self, _center: DVec3, _size: DVec3) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn create_cylinder(
        &self,
        _center: DVec3,
        _radius: f64,
        _height: f64,
        _axis: DVec3,
        _segments: u32,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn extrude(&self, _profile: &Wire2D, _plane: &SketchPlane, _distance: f64) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn loft(&self, _sections: &[(Wire2D, SketchPlane)]) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn revolve(
        &self,
        _profile: &Wire2D,
        _plane: &SketchPlane,
        _axis: &Axis3D,
        _angle: f64,
        _segments: u32,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn twist_extrude(
        &self,
        _profile: &Wire2D,
        _plane: &SketchPlane,
        _axis: &Axis3D,
        _distance: f64,
        _angle: f64,
        _steps: u32,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn tessellate(&self, _solid: &Solid) -> CadResult<TessellatedMesh> {
        Self::unavailable()
    }
}

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(super::MeshKernel::new())
}
