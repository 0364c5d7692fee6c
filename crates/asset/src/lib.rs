//! Asset loading: Wavefront OBJ meshes into GPU-ready buffers.

pub mod error;
pub mod mesh;
pub mod obj;

pub use error::{ObjError, Result};
pub use mesh::{Attribute, AttributeSlot, MeshBuffer, MeshStats, VertexLayout, VertexView};
pub use obj::{LoadOptions, load_obj_from_path, load_obj_from_reader, load_obj_from_str};
