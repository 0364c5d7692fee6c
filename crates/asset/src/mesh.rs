//! CPU-side mesh buffers handed to the renderer.
//!
//! A [`MeshBuffer`] owns one interleaved `f32` vertex stream and a flat
//! `u32` triangle index list. Attribute order inside a vertex is fixed:
//! position, normal, texcoord, tangent. Absent attributes take no space.

use std::fmt;

use corelib::Aabb;

/// Size in bytes of a single vertex component.
pub const COMPONENT_SIZE: u32 = std::mem::size_of::<f32>() as u32;

/// Per-vertex attribute kinds, in buffer order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Normal,
    Texcoord,
    Tangent,
}

impl Attribute {
    /// Number of `f32` components this attribute occupies.
    pub const fn components(self) -> u32 {
        match self {
            Attribute::Position | Attribute::Normal => 3,
            Attribute::Texcoord => 2,
            Attribute::Tangent => 4,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Normal => "normal",
            Attribute::Texcoord => "texcoord",
            Attribute::Tangent => "tangent",
        };
        f.pad(name)
    }
}

/// Where one attribute lives inside a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeSlot {
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// Interleaved vertex layout: stride plus one slot per present attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub position: AttributeSlot,
    pub normal: Option<AttributeSlot>,
    pub texcoord: Option<AttributeSlot>,
    pub tangent: Option<AttributeSlot>,
    /// Vertex size in bytes.
    pub stride: u32,
}

impl VertexLayout {
    pub fn new(has_normal: bool, has_texcoord: bool, has_tangent: bool) -> Self {
        let mut offset = 0;
        let mut place = |attribute: Attribute| {
            let slot = AttributeSlot {
                components: attribute.components(),
                offset,
            };
            offset += attribute.components() * COMPONENT_SIZE;
            slot
        };

        let position = place(Attribute::Position);
        let normal = has_normal.then(|| place(Attribute::Normal));
        let texcoord = has_texcoord.then(|| place(Attribute::Texcoord));
        let tangent = has_tangent.then(|| place(Attribute::Tangent));

        Self {
            position,
            normal,
            texcoord,
            tangent,
            stride: offset,
        }
    }

    #[inline]
    pub fn floats_per_vertex(&self) -> usize {
        (self.stride / COMPONENT_SIZE) as usize
    }

    pub fn slot(&self, attribute: Attribute) -> Option<AttributeSlot> {
        match attribute {
            Attribute::Position => Some(self.position),
            Attribute::Normal => self.normal,
            Attribute::Texcoord => self.texcoord,
            Attribute::Tangent => self.tangent,
        }
    }

    /// Present attributes in buffer order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, AttributeSlot)> + '_ {
        [
            Attribute::Position,
            Attribute::Normal,
            Attribute::Texcoord,
            Attribute::Tangent,
        ]
        .into_iter()
        .filter_map(|attribute| self.slot(attribute).map(|slot| (attribute, slot)))
    }
}

/// Per-vertex attribute streams of equal length, ready to be interleaved.
#[derive(Clone, Copy, Debug)]
pub struct VertexStreams<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: Option<&'a [[f32; 3]]>,
    pub texcoords: Option<&'a [[f32; 2]]>,
    pub tangents: Option<&'a [[f32; 4]]>,
}

/// Facts about the source file and the produced buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshStats {
    pub positions: usize,
    pub normals: usize,
    pub texcoords: usize,
    /// Polygon faces before triangulation.
    pub faces: usize,
    pub triangles: usize,
    /// Bounds of every declared position, referenced or not.
    pub bounds: Aabb,
}

/// Decoded attributes of one output vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexView {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub texcoord: Option<[f32; 2]>,
    pub tangent: Option<[f32; 4]>,
}

/// Indexed triangle mesh with an interleaved vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<f32>,
    indices: Vec<u32>,
    layout: VertexLayout,
    stats: MeshStats,
}

impl MeshBuffer {
    /// Interleave `streams` according to the layout they imply and flatten
    /// `triangles` into the index buffer.
    pub fn assemble(streams: VertexStreams<'_>, triangles: &[[u32; 3]], stats: MeshStats) -> Self {
        let vertex_count = streams.positions.len();
        debug_assert!(streams.normals.is_none_or(|n| n.len() == vertex_count));
        debug_assert!(streams.texcoords.is_none_or(|t| t.len() == vertex_count));
        debug_assert!(streams.tangents.is_none_or(|t| t.len() == vertex_count));

        let layout = VertexLayout::new(
            streams.normals.is_some(),
            streams.texcoords.is_some(),
            streams.tangents.is_some(),
        );

        let mut vertices = Vec::with_capacity(vertex_count * layout.floats_per_vertex());
        for i in 0..vertex_count {
            vertices.extend_from_slice(&streams.positions[i]);
            if let Some(normals) = streams.normals {
                vertices.extend_from_slice(&normals[i]);
            }
            if let Some(texcoords) = streams.texcoords {
                vertices.extend_from_slice(&texcoords[i]);
            }
            if let Some(tangents) = streams.tangents {
                vertices.extend_from_slice(&tangents[i]);
            }
        }

        let indices = triangles.iter().flatten().copied().collect();

        Self {
            vertices,
            indices,
            layout,
            stats,
        }
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn stats(&self) -> &MeshStats {
        &self.stats
    }

    /// Interleaved vertex data as floats.
    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Decode vertex `index` back into its attributes.
    pub fn vertex(&self, index: usize) -> Option<VertexView> {
        let floats = self.layout.floats_per_vertex();
        let start = index.checked_mul(floats)?;
        let data = self.vertices.get(start..start.checked_add(floats)?)?;

        let read = |slot: AttributeSlot| {
            let at = (slot.offset / COMPONENT_SIZE) as usize;
            &data[at..at + slot.components as usize]
        };

        Some(VertexView {
            position: to_array(read(self.layout.position)),
            normal: self.layout.normal.map(|s| to_array(read(s))),
            texcoord: self.layout.texcoord.map(|s| to_array(read(s))),
            tangent: self.layout.tangent.map(|s| to_array(read(s))),
        })
    }

    /// Vertex buffer size in bytes.
    pub fn vertex_buffer_size(&self) -> usize {
        self.vertices.len() * COMPONENT_SIZE as usize
    }

    /// Index buffer size in bytes.
    pub fn index_buffer_size(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Size the same triangles would take as a non-indexed vertex list.
    pub fn naive_size(&self) -> usize {
        3 * self.triangle_count() * self.layout.stride as usize
    }
}

fn to_array<const N: usize>(values: &[f32]) -> [f32; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(values);
    out
}
