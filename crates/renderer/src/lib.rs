//! Renderer-facing view of loaded meshes.
//! Translates an [`asset::VertexLayout`] into wgpu vertex/index buffer
//! descriptions. Nothing here touches a device; the caller creates the
//! buffers and pipelines.

use asset::{Attribute, AttributeSlot, MeshBuffer, VertexLayout};
use wgpu::{
    BufferAddress, BufferUsages, IndexFormat, VertexAttribute, VertexBufferLayout, VertexFormat,
    VertexStepMode, util::BufferInitDescriptor,
};

/// Index buffers are always 32-bit.
pub const INDEX_FORMAT: IndexFormat = IndexFormat::Uint32;

/// Fixed shader location per attribute, independent of which ones a mesh has.
pub const fn shader_location(attribute: Attribute) -> u32 {
    match attribute {
        Attribute::Position => 0,
        Attribute::Normal => 1,
        Attribute::Texcoord => 2,
        Attribute::Tangent => 3,
    }
}

fn vertex_format(slot: AttributeSlot) -> VertexFormat {
    match slot.components {
        2 => VertexFormat::Float32x2,
        3 => VertexFormat::Float32x3,
        4 => VertexFormat::Float32x4,
        n => unreachable!("no f32 vertex format with {n} components"),
    }
}

/// Owned wgpu attribute list for one interleaved vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuVertexLayout {
    array_stride: BufferAddress,
    attributes: Vec<VertexAttribute>,
}

impl GpuVertexLayout {
    pub fn new(layout: &VertexLayout) -> Self {
        let attributes = layout
            .attributes()
            .map(|(attribute, slot)| VertexAttribute {
                format: vertex_format(slot),
                offset: slot.offset as BufferAddress,
                shader_location: shader_location(attribute),
            })
            .collect();

        Self {
            array_stride: layout.stride as BufferAddress,
            attributes,
        }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn array_stride(&self) -> BufferAddress {
        self.array_stride
    }

    /// Borrowed layout for `VertexState::buffers`.
    pub fn buffer_layout(&self) -> VertexBufferLayout<'_> {
        VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Everything needed to upload and draw one mesh.
#[derive(Debug)]
pub struct MeshUpload<'a> {
    pub vertex_buffer: BufferInitDescriptor<'a>,
    pub index_buffer: BufferInitDescriptor<'a>,
    pub index_count: u32,
    pub layout: GpuVertexLayout,
}

impl<'a> MeshUpload<'a> {
    pub fn new(mesh: &'a MeshBuffer, label: Option<&'a str>) -> Self {
        let layout = GpuVertexLayout::new(mesh.layout());
        log::debug!(
            "Mesh upload {:?}: {} vertices x {} bytes, {} indices, {} attributes",
            label,
            mesh.vertex_count(),
            layout.array_stride(),
            mesh.index_count(),
            layout.attributes().len()
        );

        Self {
            vertex_buffer: BufferInitDescriptor {
                label,
                contents: mesh.vertex_bytes(),
                usage: BufferUsages::VERTEX,
            },
            index_buffer: BufferInitDescriptor {
                label,
                contents: mesh.index_bytes(),
                usage: BufferUsages::INDEX,
            },
            index_count: mesh.index_count() as u32,
            layout,
        }
    }
}
