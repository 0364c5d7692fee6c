//! Wavefront OBJ loader: positions, normals, texture coordinates and
//! polygon faces (fan-triangulated). Groups, materials and smoothing
//! groups are skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{ObjError, Result};
use crate::mesh::{MeshBuffer, MeshStats, VertexStreams};

mod face;
mod format;
mod parse;
mod reindex;
mod tangent;
mod triangulate;

pub use face::{DeclaredCounts, FaceVertexRef};
pub use format::VertexFormat;
pub use reindex::{Reindexed, reindex};
pub use tangent::{Tangents, compute_tangents};
pub use triangulate::FaceTriangle;

/// Knobs for a single load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Append a 4-component tangent to every vertex. Ignored, with a
    /// warning, unless the file has both normals and texcoords.
    pub compute_tangents: bool,
}

impl LoadOptions {
    pub fn with_tangents(mut self, compute_tangents: bool) -> Self {
        self.compute_tangents = compute_tangents;
        self
    }
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<MeshBuffer> {
    let path = path.as_ref();
    log::info!("Loading '{}'", path.display());

    let file = File::open(path).map_err(|source| ObjError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader(BufReader::new(file), options)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<MeshBuffer> {
    let raw = parse::parse_obj(reader)?;
    build_mesh(raw, options)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, options: &LoadOptions) -> Result<MeshBuffer> {
    load_obj_from_reader(io::Cursor::new(contents), options)
}

fn build_mesh(raw: parse::RawObj, options: &LoadOptions) -> Result<MeshBuffer> {
    let parse::RawObj {
        positions,
        normals,
        texcoords,
        mut triangles,
        format,
        faces,
        bounds,
    } = raw;

    log::info!(
        "Loaded {} positions, {} normals, {} texture coordinates, {} faces ({} triangles)",
        positions.len(),
        normals.len(),
        texcoords.len(),
        faces,
        triangles.len()
    );

    let format = format.ok_or(ObjError::NoGeometry)?;
    let format = format::infer_missing(
        format,
        positions.len(),
        normals.len(),
        texcoords.len(),
        &mut triangles,
    );

    let with_tangents = match (options.compute_tangents, format.normal && format.texcoord) {
        (true, true) => true,
        (true, false) => {
            log::warn!(
                "Tangents will not be computed because normals and/or texture coordinates are missing"
            );
            false
        }
        (false, _) => false,
    };

    let dense = reindex::reindex(&positions, &normals, &texcoords, &triangles, format)?;

    let tangents = with_tangents.then(|| {
        let out = tangent::compute_tangents(
            &dense.positions,
            &dense.normals,
            &dense.texcoords,
            &dense.triangles,
        );
        if out.degenerate_triangles > 0 {
            log::warn!(
                "{} triangles with degenerate texture mapping skipped during tangent computation",
                out.degenerate_triangles
            );
        }
        out.tangents
    });

    let stats = MeshStats {
        positions: positions.len(),
        normals: normals.len(),
        texcoords: texcoords.len(),
        faces,
        triangles: triangles.len(),
        bounds,
    };

    let mesh = MeshBuffer::assemble(
        VertexStreams {
            positions: &dense.positions,
            normals: format.normal.then_some(dense.normals.as_slice()),
            texcoords: format.texcoord.then_some(dense.texcoords.as_slice()),
            tangents: tangents.as_deref(),
        },
        &dense.triangles,
        stats,
    );

    log::info!(
        "Found {} unique vertices, using {} indices",
        mesh.vertex_count(),
        mesh.index_count()
    );
    log::debug!(
        "Vertex size {} bytes; VBO {} bytes, IBO {} bytes, naive {} bytes; bounds {}",
        mesh.layout().stride,
        mesh.vertex_buffer_size(),
        mesh.index_buffer_size(),
        mesh.naive_size(),
        bounds
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src, &LoadOptions::default()).expect("parse triangle");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.layout().stride, 32);
        assert_eq!(mesh.layout().tangent, None);
    }

    #[test]
    fn file_without_faces_has_no_geometry() {
        let err = load_obj_from_str("v 0 0 0\nv 1 0 0\n", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ObjError::NoGeometry));
    }

    #[test]
    fn tangents_need_normals_and_texcoords() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
        let options = LoadOptions::default().with_tangents(true);
        let mesh = load_obj_from_str(src, &options).expect("load");
        assert_eq!(mesh.layout().tangent, None);
        assert_eq!(mesh.layout().stride, 20);
    }

    #[test]
    fn tangents_are_appended_last() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\n\
                   f 1/1/1 2/2/1 3/3/1\n";
        let options = LoadOptions::default().with_tangents(true);
        let mesh = load_obj_from_str(src, &options).expect("load");
        let layout = mesh.layout();
        assert_eq!(layout.tangent.map(|s| (s.components, s.offset)), Some((4, 32)));
        assert_eq!(layout.stride, 48);
        let v = mesh.vertex(0).expect("vertex");
        assert_eq!(v.tangent, Some([1.0, 0.0, 0.0, 1.0]));
    }
}
