//! Line-by-line OBJ reader producing raw, still indirect geometry.

use std::io::BufRead;

use corelib::{Aabb, Vec3};

use super::face::{DeclaredCounts, FaceVertexRef};
use super::format::{FormatValidator, VertexFormat};
use super::triangulate::{self, FaceTriangle};
use crate::error::{ObjError, Result};

/// Everything an OBJ file declares, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RawObj {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub triangles: Vec<FaceTriangle>,
    /// `None` when the file has no faces.
    pub format: Option<VertexFormat>,
    pub faces: usize,
    pub bounds: Aabb,
}

impl RawObj {
    fn counts(&self) -> DeclaredCounts {
        DeclaredCounts {
            positions: self.positions.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
        }
    }
}

type Malformed = fn(usize, String) -> ObjError;

pub fn parse_obj<R: BufRead>(reader: R) -> Result<RawObj> {
    let mut raw = RawObj::default();
    let mut validator = FormatValidator::new();
    let mut face: Vec<FaceVertexRef> = Vec::new();

    // Split on raw bytes: stray non-UTF-8 in comments or names must not fail the load.
    for (line_no, bytes) in reader.split(b'\n').enumerate() {
        let line_no = line_no + 1;
        let bytes = bytes.map_err(|source| ObjError::Read {
            line: line_no,
            source,
        })?;
        let line = String::from_utf8_lossy(&bytes);

        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        if tag.starts_with('#') {
            continue;
        }

        match tag {
            "v" => {
                let p = parse_floats::<3>(&mut parts, line_no, |line, reason| {
                    ObjError::MalformedVertex { line, reason }
                })?;
                raw.bounds.grow(Vec3::from_array(p));
                raw.positions.push(p);
            }
            "vn" => {
                let n = parse_floats::<3>(&mut parts, line_no, |line, reason| {
                    ObjError::MalformedNormal { line, reason }
                })?;
                raw.normals.push(n);
            }
            "vt" => {
                let uv = parse_floats::<2>(&mut parts, line_no, |line, reason| {
                    ObjError::MalformedTexcoord { line, reason }
                })?;
                raw.texcoords.push(uv);
            }
            "f" => {
                let counts = raw.counts();
                face.clear();
                for token in parts {
                    face.push(FaceVertexRef::parse(token, counts, line_no)?);
                }

                let triangles = triangulate::fan(&face, line_no)?;
                for vertex in &face {
                    validator.check(vertex, line_no)?;
                }
                raw.triangles
                    .extend(triangles.map(|corners| FaceTriangle::new(corners, line_no)));
                raw.faces += 1;
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/mtllib/etc.)
            }
        }
    }

    raw.format = validator.format();
    Ok(raw)
}

/// Read the first `N` components of a declaration; extra trailing values
/// (a `vt` w, vertex colours) are ignored.
fn parse_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    malformed: Malformed,
) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts.next().ok_or_else(|| {
            malformed(
                line_no,
                format!("expected {} components, found {}", N, i),
            )
        })?;
        *slot = token
            .parse::<f32>()
            .map_err(|e| malformed(line_no, format!("invalid number '{}': {}", token, e)))?;
    }
    Ok(out)
}
