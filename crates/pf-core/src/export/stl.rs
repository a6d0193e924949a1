//! STL encoders

use std::io::Write;

use pf_cad::TessellatedMesh;

/// Write `mesh` as binary STL through `stl_io`
pub(crate) fn write_binary<W: Write>(mesh: &TessellatedMesh, writer: &mut W) -> std::io::Result<()> {
    let triangles: Vec<stl_io::Triangle> = (0..mesh.triangle_count())
        .map(|i| {
            let [v0, v1, v2] = mesh.triangle(i);
            stl_io::Triangle {
                normal: stl_io::Normal::new(mesh.triangle_normal(i)),
                vertices: [
                    stl_io::Vertex::new(v0),
                    stl_io::Vertex::new(v1),
                    stl_io::Vertex::new(v2),
                ],
            }
        })
        .collect();
    stl_io::write_stl(writer, triangles.iter())
}

/// Write `mesh` as ASCII STL
pub(crate) fn write_ascii<W: Write>(mesh: &TessellatedMesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "solid mesh")?;

    for i in 0..mesh.triangle_count() {
        let [nx, ny, nz] = mesh.triangle_normal(i);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in mesh.triangle(i) {
            writeln!(writer, "      vertex {x:.6e} {y:.6e} {z:.6e}")?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;
    Ok(())
}
