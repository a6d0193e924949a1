//! Partforge core
//!
//! This crate provides:
//! - The catalog of parametric part generators
//! - The generation routine with its part-ready observer
//! - STL export with atomic file replacement
//! - RON configuration for parameters and output settings

pub mod config;
pub mod export;
pub mod generate;
pub mod parts;

pub use config::{ConfigError, GeneratorConfig, PartParams};
pub use export::{ExportError, ExportOptions, StlFormat, write_mesh_atomic, write_stl_atomic};
pub use generate::{ExportedPart, GenerateError, GenerateOptions, Generator, select_generators};
pub use parts::{BuildContext, BuiltPart, PartGenerator, catalog};
