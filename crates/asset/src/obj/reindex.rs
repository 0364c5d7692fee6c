//! Collapse per-attribute OBJ indices into one dense vertex index.
//!
//! OBJ lets every corner pick its position, normal and texcoord
//! independently; GPUs want a single index per vertex. Each distinct
//! `(position, normal, texcoord)` combination becomes one output vertex,
//! numbered in order of first appearance.

use std::collections::HashMap;

use super::face::FaceVertexRef;
use super::format::VertexFormat;
use super::triangulate::FaceTriangle;
use crate::error::{ObjError, Result};
use crate::mesh::Attribute;

/// Identity of one output vertex. Attributes outside the active format
/// are always `None`, so they never split a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    position: u32,
    normal: Option<u32>,
    texcoord: Option<u32>,
}

impl DedupKey {
    fn new(corner: &FaceVertexRef, format: VertexFormat) -> Option<Self> {
        Some(Self {
            position: corner.position?,
            normal: corner.normal.filter(|_| format.normal),
            texcoord: corner.texcoord.filter(|_| format.texcoord),
        })
    }
}

/// Dense per-vertex attribute arrays plus triangles indexing into them.
/// `normals`/`texcoords` are empty when the format lacks them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reindexed {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub triangles: Vec<[u32; 3]>,
}

impl Reindexed {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

pub fn reindex(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    triangles: &[FaceTriangle],
    format: VertexFormat,
) -> Result<Reindexed> {
    let mut unique: HashMap<DedupKey, u32> = HashMap::with_capacity(positions.len());
    let mut out = Reindexed {
        positions: Vec::with_capacity(positions.len()),
        normals: Vec::with_capacity(if format.normal { normals.len() } else { 0 }),
        texcoords: Vec::with_capacity(if format.texcoord { texcoords.len() } else { 0 }),
        triangles: Vec::with_capacity(triangles.len()),
    };

    for triangle in triangles {
        let line = triangle.line;
        let mut dense = [0u32; 3];
        for (slot, corner) in dense.iter_mut().zip(&triangle.corners) {
            let key = DedupKey::new(corner, format).ok_or(ObjError::IndexOutOfRange {
                line,
                attribute: Attribute::Position,
                index: 0,
                count: positions.len(),
            })?;

            *slot = match unique.get(&key) {
                Some(&index) => index,
                None => {
                    let index = u32::try_from(out.positions.len())
                        .map_err(|_| ObjError::TooManyVertices)?;

                    out.positions
                        .push(fetch(positions, Some(key.position), Attribute::Position, line)?);
                    if format.normal {
                        out.normals
                            .push(fetch(normals, key.normal, Attribute::Normal, line)?);
                    }
                    if format.texcoord {
                        out.texcoords
                            .push(fetch(texcoords, key.texcoord, Attribute::Texcoord, line)?);
                    }

                    unique.insert(key, index);
                    index
                }
            };
        }
        out.triangles.push(dense);
    }

    Ok(out)
}

/// Copy the element at a 1-based OBJ index; a missing index counts as 0.
fn fetch<T: Copy>(data: &[T], index: Option<u32>, attribute: Attribute, line: usize) -> Result<T> {
    let index = index.unwrap_or(0);
    (index as usize)
        .checked_sub(1)
        .and_then(|i| data.get(i))
        .copied()
        .ok_or(ObjError::IndexOutOfRange {
            line,
            attribute,
            index: index.into(),
            count: data.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(p: u32) -> FaceVertexRef {
        FaceVertexRef::new(Some(p), None, None)
    }

    fn vtn(p: u32, t: u32, n: u32) -> FaceVertexRef {
        FaceVertexRef::new(Some(p), Some(t), Some(n))
    }

    /// Number triangles as if each came from its own `f` line.
    fn faces(triangles: &[[FaceVertexRef; 3]]) -> Vec<FaceTriangle> {
        triangles
            .iter()
            .enumerate()
            .map(|(i, &corners)| FaceTriangle::new(corners, i + 1))
            .collect()
    }

    fn quad_positions() -> Vec<[f32; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn shared_positions_collapse_in_first_seen_order() {
        let positions = quad_positions();
        let triangles = [[v(3), v(1), v(2)], [v(3), v(2), v(4)]];
        let out = reindex(&positions, &[], &[], &faces(&triangles), VertexFormat::POSITION).unwrap();

        assert_eq!(out.triangles, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(
            out.positions,
            vec![positions[2], positions[0], positions[1], positions[3]]
        );
        assert!(out.normals.is_empty());
        assert!(out.texcoords.is_empty());
    }

    #[test]
    fn differing_normals_split_a_position() {
        let positions = quad_positions();
        let normals = vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
        let format = VertexFormat::POSITION.with_normal();
        let corner = |p, n| FaceVertexRef::new(Some(p), None, Some(n));
        let triangles = [
            [corner(1, 1), corner(2, 1), corner(3, 1)],
            [corner(1, 2), corner(3, 2), corner(4, 2)],
        ];

        let out = reindex(&positions, &normals, &[], &faces(&triangles), format).unwrap();
        assert_eq!(out.vertex_count(), 6);
        assert_eq!(out.triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(out.positions[0], out.positions[3]);
        assert_eq!(out.normals[0], normals[0]);
        assert_eq!(out.normals[3], normals[1]);
    }

    #[test]
    fn every_distinct_key_maps_to_one_vertex() {
        let positions = quad_positions();
        let normals = vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];
        let texcoords = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let format = VertexFormat::POSITION.with_normal().with_texcoord();
        let triangles = [
            [vtn(1, 1, 1), vtn(2, 2, 1), vtn(3, 3, 1)],
            [vtn(1, 1, 1), vtn(3, 3, 1), vtn(4, 4, 1)],
            [vtn(1, 1, 2), vtn(3, 3, 2), vtn(2, 2, 2)],
            [vtn(1, 4, 1), vtn(2, 2, 1), vtn(3, 3, 1)],
        ];

        let out = reindex(&positions, &normals, &texcoords, &faces(&triangles), format).unwrap();

        let mut seen: HashMap<FaceVertexRef, u32> = HashMap::new();
        for (raw, dense) in triangles.iter().zip(&out.triangles) {
            for (corner, &index) in raw.iter().zip(dense) {
                assert!((index as usize) < out.vertex_count());
                if let Some(&prev) = seen.get(corner) {
                    assert_eq!(prev, index, "{corner:?} split");
                }
                seen.insert(*corner, index);

                let i = index as usize;
                assert_eq!(out.positions[i], positions[corner.position.unwrap() as usize - 1]);
                assert_eq!(out.normals[i], normals[corner.normal.unwrap() as usize - 1]);
                assert_eq!(
                    out.texcoords[i],
                    texcoords[corner.texcoord.unwrap() as usize - 1]
                );
            }
        }
        assert_eq!(seen.len(), out.vertex_count());
        assert_eq!(out.vertex_count(), 8);
    }

    #[test]
    fn inactive_attributes_do_not_split_vertices() {
        let positions = quad_positions();
        let triangles = [
            [vtn(1, 1, 1), vtn(2, 1, 1), vtn(3, 1, 1)],
            [vtn(1, 2, 2), vtn(3, 2, 2), vtn(4, 2, 2)],
        ];
        let out = reindex(&positions, &[], &[], &faces(&triangles), VertexFormat::POSITION).unwrap();
        assert_eq!(out.vertex_count(), 4);
        assert_eq!(out.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn index_past_the_end_is_out_of_range() {
        let positions = quad_positions();
        let triangles = [[v(1), v(2), v(3)], [v(1), v(2), v(9)]];
        let err = reindex(&positions, &[], &[], &faces(&triangles), VertexFormat::POSITION)
            .unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange {
                line: 2,
                attribute: Attribute::Position,
                index: 9,
                count: 4
            }
        ));

        let normals = vec![[0.0, 0.0, 1.0]];
        let corner = |p| FaceVertexRef::new(Some(p), None, Some(2));
        let triangles = [FaceTriangle::new([corner(1), corner(2), corner(3)], 12)];
        let err = reindex(
            &positions,
            &normals,
            &[],
            &triangles,
            VertexFormat::POSITION.with_normal(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange {
                line: 12,
                attribute: Attribute::Normal,
                index: 2,
                count: 1
            }
        ));
    }
}
