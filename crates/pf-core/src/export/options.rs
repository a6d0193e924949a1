//! Export options for STL output

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// STL flavour written to disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Export options for STL generation
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output directory
    pub output_dir: PathBuf,
    pub format: StlFormat,
}

impl ExportOptions {
    /// Path of the STL file for a part named `name`
    pub fn part_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.stl"))
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: StlFormat::Binary,
        }
    }
}
