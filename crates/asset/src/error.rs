//! Errors produced while loading a mesh.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::mesh::Attribute;
use crate::obj::VertexFormat;

/// Every way an OBJ load can fail. None of them leave a partial mesh behind.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to open OBJ file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read OBJ line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("OBJ line {line}: malformed vertex position: {reason}")]
    MalformedVertex { line: usize, reason: String },

    #[error("OBJ line {line}: malformed vertex normal: {reason}")]
    MalformedNormal { line: usize, reason: String },

    #[error("OBJ line {line}: malformed texture coordinate: {reason}")]
    MalformedTexcoord { line: usize, reason: String },

    #[error("OBJ line {line}: malformed face vertex '{token}'")]
    MalformedIndex { line: usize, token: String },

    #[error("OBJ line {line}: face requires at least 3 vertices, found {count}")]
    InvalidFace { line: usize, count: usize },

    #[error("OBJ line {line}: first face vertex has no position index")]
    MissingPosition { line: usize },

    #[error("OBJ line {line}: inconsistent vertex format '{found}', expected '{expected}'")]
    InconsistentFormat {
        line: usize,
        expected: VertexFormat,
        found: VertexFormat,
    },

    #[error("OBJ line {line}: {attribute} index {index} is out of range ({count} declared)")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        count: usize,
    },

    #[error("OBJ contained no faces")]
    NoGeometry,

    #[error("too many unique vertices in OBJ (>{})", u32::MAX)]
    TooManyVertices,
}

pub type Result<T> = std::result::Result<T, ObjError>;
