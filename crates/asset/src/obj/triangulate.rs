//! Fan triangulation of convex polygon faces.

use super::face::FaceVertexRef;
use crate::error::{ObjError, Result};

/// One fan triangle of an `f` line, remembering where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTriangle {
    pub corners: [FaceVertexRef; 3],
    pub line: usize,
}

impl FaceTriangle {
    pub fn new(corners: [FaceVertexRef; 3], line: usize) -> Self {
        Self { corners, line }
    }
}

/// Split a polygon into `n - 2` triangles anchored at its first corner:
/// triangle `i` is `(v[0], v[i + 1], v[i + 2])`.
pub fn fan<T: Copy>(polygon: &[T], line: usize) -> Result<impl Iterator<Item = [T; 3]> + '_> {
    if polygon.len() < 3 {
        return Err(ObjError::InvalidFace {
            line,
            count: polygon.len(),
        });
    }

    let first = polygon[0];
    Ok(polygon.windows(2).skip(1).map(move |w| [first, w[0], w[1]]))
}
