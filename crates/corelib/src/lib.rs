//! Core types: math re-exports and bounding volumes.

pub use glam::{Vec2, Vec3};

pub mod bounds;

pub use bounds::Aabb;
