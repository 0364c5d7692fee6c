//! Vertex format of a file: which attributes every face-vertex carries.

use std::fmt;

use super::face::FaceVertexRef;
use super::triangulate::FaceTriangle;
use crate::error::{ObjError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexFormat {
    pub position: bool,
    pub texcoord: bool,
    pub normal: bool,
}

impl VertexFormat {
    pub const POSITION: Self = Self {
        position: true,
        texcoord: false,
        normal: false,
    };

    pub fn of(vertex: &FaceVertexRef) -> Self {
        Self {
            position: vertex.position.is_some(),
            texcoord: vertex.texcoord.is_some(),
            normal: vertex.normal.is_some(),
        }
    }

    pub fn with_normal(self) -> Self {
        Self {
            normal: true,
            ..self
        }
    }

    pub fn with_texcoord(self) -> Self {
        Self {
            texcoord: true,
            ..self
        }
    }
}

/// Written in face-token shape: `v`, `v/vt`, `v//vn`, `v/vt/vn`.
impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position {
            f.write_str("v")?;
        }
        if self.texcoord || self.normal {
            f.write_str("/")?;
        }
        if self.texcoord {
            f.write_str("vt")?;
        }
        if self.normal {
            f.write_str("/vn")?;
        }
        Ok(())
    }
}

/// Locks the format on the first face-vertex and rejects any later one
/// that differs.
#[derive(Debug, Default)]
pub struct FormatValidator {
    format: Option<VertexFormat>,
}

impl FormatValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format fixed so far, `None` until the first face is seen.
    pub fn format(&self) -> Option<VertexFormat> {
        self.format
    }

    pub fn check(&mut self, vertex: &FaceVertexRef, line: usize) -> Result<()> {
        let found = VertexFormat::of(vertex);
        let expected = match self.format {
            Some(expected) => expected,
            None => {
                if !found.position {
                    return Err(ObjError::MissingPosition { line });
                }
                log::debug!("OBJ vertex format '{}' (line {})", found, line);
                *self.format.insert(found)
            }
        };

        if found != expected {
            return Err(ObjError::InconsistentFormat {
                line,
                expected,
                found,
            });
        }
        Ok(())
    }
}

/// Fill in normals/texcoords the faces never reference when the file
/// declares exactly one per position, pairing them by position index.
///
/// Only counts are compared; nothing checks the pairing makes geometric sense.
pub fn infer_missing(
    format: VertexFormat,
    positions: usize,
    normals: usize,
    texcoords: usize,
    triangles: &mut [FaceTriangle],
) -> VertexFormat {
    let mut format = format;

    if !format.normal && normals == positions {
        log::debug!("Assuming 1:1 normal/position correspondence ({} normals)", normals);
        for corner in triangles.iter_mut().flat_map(|t| t.corners.iter_mut()) {
            corner.normal = corner.position;
        }
        format = format.with_normal();
    }

    if !format.texcoord && texcoords == positions {
        log::debug!(
            "Assuming 1:1 texcoord/position correspondence ({} texcoords)",
            texcoords
        );
        for corner in triangles.iter_mut().flat_map(|t| t.corners.iter_mut()) {
            corner.texcoord = corner.position;
        }
        format = format.with_texcoord();
    }

    format
}
