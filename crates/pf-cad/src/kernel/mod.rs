//! CAD Kernel Abstraction Layer
//!
//! Provides a trait-based abstraction over geometry kernels so that part
//! code and the feature combinator never depend on one implementation.

mod mesh;
mod traits;
mod wire;

pub use mesh::MeshKernel;
pub use traits::*;
pub use wire::{Wire2D, triangulate};
