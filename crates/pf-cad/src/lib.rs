//! CAD Kernel Abstraction and Deferred Features
//!
//! This crate provides:
//! - Abstract CAD kernel traits for geometry operations
//! - A pure Rust polygon kernel with BSP booleans
//! - Sketch planes, 2D profiles and point patterns
//! - The deferred feature combinator used to assemble parts

pub mod feature;
pub mod kernel;
pub mod pattern;
pub mod sketch;

// Re-exports for convenience
pub use feature::{Feature, FeatureError, FeatureResult, combine_features, resolve_features};
pub use kernel::{
    Axis3D, BooleanType, CadError, CadKernel, CadResult, MeshKernel, NullKernel, Solid, SolidOps,
    TessellatedMesh, Wire2D, default_kernel,
};
pub use pattern::{polar_array, rect_array};
pub use sketch::SketchPlane;
