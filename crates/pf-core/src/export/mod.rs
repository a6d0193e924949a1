//! STL export functionality
//!
//! Files are written to a temporary sibling first and renamed over the
//! destination, so a failed export never leaves a truncated file behind.

mod options;
mod stl;

use std::io::{BufWriter, Write};
use std::path::Path;

use pf_cad::{CadError, CadKernel, Solid, TessellatedMesh};
use tempfile::NamedTempFile;

pub use options::{ExportOptions, StlFormat};

/// Tessellate `solid` and write it to `path`, returning the triangle count
pub fn write_stl_atomic(
    kernel: &dyn CadKernel,
    solid: &Solid,
    path: impl AsRef<Path>,
    format: StlFormat,
) -> Result<usize, ExportError> {
    let mesh = kernel.tessellate(solid)?;
    write_mesh_atomic(&mesh, path, format)
}

/// Write an already tessellated mesh to `path`, returning the triangle count
pub fn write_mesh_atomic(
    mesh: &TessellatedMesh,
    path: impl AsRef<Path>,
    format: StlFormat,
) -> Result<usize, ExportError> {
    let path = path.as_ref();
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| ExportError::Io(e.to_string()))?;

    {
        let mut writer = BufWriter::new(file.as_file_mut());
        let written = match format {
            StlFormat::Binary => stl::write_binary(mesh, &mut writer),
            StlFormat::Ascii => stl::write_ascii(mesh, &mut writer),
        };
        written
            .and_then(|()| writer.flush())
            .map_err(|e| ExportError::Write(e.to_string()))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|e| ExportError::Io(e.to_string()))?;

    file.persist(path)
        .map_err(|e| ExportError::Io(e.error.to_string()))?;

    let triangles = mesh.triangle_count();
    tracing::debug!("Wrote {} triangles to {}", triangles, path.display());
    Ok(triangles)
}

/// Export-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Mesh has no triangles")]
    EmptyMesh,
    #[error("Kernel error: {0}")]
    Kernel(#[from] CadError),
    #[error("STL write failed: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use pf_cad::MeshKernel;

    fn unit_cube(kernel: &MeshKernel) -> Solid {
        kernel
            .create_box(DVec3::splat(0.5), DVec3::ONE)
            .unwrap()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_binary_round_trip() {
        let kernel = MeshKernel::new();
        let cube = unit_cube(&kernel);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");

        let triangles = write_stl_atomic(&kernel, &cube, &path, StlFormat::Binary).unwrap();
        assert_eq!(triangles, 12);

        let mut file = std::fs::File::open(&path).unwrap();
        let read = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(read.faces.len(), 12);
        assert_eq!(read.vertices.len(), 8);
        assert!(read.validate().is_ok());
    }

    #[test]
    fn test_ascii_output() {
        let kernel = MeshKernel::new();
        let cube = unit_cube(&kernel);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");

        write_stl_atomic(&kernel, &cube, &path, StlFormat::Ascii).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("solid mesh\n"));
        assert!(text.trim_end().ends_with("endsolid mesh"));
        assert_eq!(text.matches("facet normal").count(), 12);
    }

    #[test]
    fn test_replaces_existing_file() {
        let kernel = MeshKernel::new();
        let cube = unit_cube(&kernel);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        std::fs::write(&path, "old").unwrap();

        write_stl_atomic(&kernel, &cube, &path, StlFormat::Ascii).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("solid mesh"));
        assert_eq!(dir_entries(dir.path()), vec!["cube.stl"]);
    }

    #[test]
    fn test_failure_keeps_old_file() {
        let kernel = MeshKernel::new();
        // Handle owned by another kernel
        let cube = unit_cube(&MeshKernel::new());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        std::fs::write(&path, "old").unwrap();

        let result = write_stl_atomic(&kernel, &cube, &path, StlFormat::Binary);
        assert!(matches!(result, Err(ExportError::Kernel(CadError::SolidNotFound(_)))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(dir_entries(dir.path()), vec!["cube.stl"]);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.stl");
        let result = write_mesh_atomic(&TessellatedMesh::new(), &path, StlFormat::Binary);
        assert!(matches!(result, Err(ExportError::EmptyMesh)));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("cube.stl");
        let kernel = MeshKernel::new();
        let cube = unit_cube(&kernel);
        let result = write_stl_atomic(&kernel, &cube, &path, StlFormat::Binary);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
