//! Face-vertex references: the `v`, `v/vt`, `v/vt/vn` and `v//vn` tokens of an `f` line.

use crate::error::{ObjError, Result};
use crate::mesh::Attribute;

/// Number of each attribute declared so far, used to resolve negative indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclaredCounts {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

/// One polygon corner. Indices are 1-based, already resolved to absolute form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceVertexRef {
    pub position: Option<u32>,
    pub texcoord: Option<u32>,
    pub normal: Option<u32>,
}

impl FaceVertexRef {
    pub fn new(position: Option<u32>, texcoord: Option<u32>, normal: Option<u32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// Parse a face token. Negative indices count back from the last
    /// element declared before this line.
    pub fn parse(token: &str, counts: DeclaredCounts, line: usize) -> Result<Self> {
        let malformed = || ObjError::MalformedIndex {
            line,
            token: token.to_owned(),
        };

        let mut fields = token.split('/');
        let position = fields.next().unwrap_or_default();
        let texcoord = fields.next().unwrap_or_default();
        let normal = fields.next().unwrap_or_default();
        if fields.next().is_some() {
            return Err(malformed());
        }

        let field = |raw: &str, count: usize, attribute: Attribute| -> Result<Option<u32>> {
            if raw.is_empty() {
                return Ok(None);
            }
            let value = raw.parse::<i64>().map_err(|_| malformed())?;
            resolve_index(value, count, attribute, line).map(Some)
        };

        Ok(Self {
            position: field(position, counts.positions, Attribute::Position)?,
            texcoord: field(texcoord, counts.texcoords, Attribute::Texcoord)?,
            normal: field(normal, counts.normals, Attribute::Normal)?,
        })
    }
}

/// Turn a raw OBJ index into an absolute 1-based one.
///
/// Positive values pass through; negative ones become `count + value + 1`.
/// Anything that lands below 1 cannot address an element.
fn resolve_index(value: i64, count: usize, attribute: Attribute, line: usize) -> Result<u32> {
    let resolved = if value < 0 {
        count as i64 + value + 1
    } else {
        value
    };

    if resolved < 1 {
        return Err(ObjError::IndexOutOfRange {
            line,
            attribute,
            index: value,
            count,
        });
    }

    u32::try_from(resolved).map_err(|_| ObjError::IndexOutOfRange {
        line,
        attribute,
        index: value,
        count,
    })
}
