//! Meshview Core - Mesh data model and validation
//!
//! This crate provides the foundational types shared by the viewer and the
//! exporters:
//! - `RawMesh`, the decoded output of a binary mesh parser
//! - `BoneSet`, the optional skeleton attached to a mesh
//! - `MeshError`, the geometry contract violations both consumers report

pub mod error;
pub mod mesh;

pub use error::MeshError;
pub use mesh::{BoneSet, RawMesh, MAX_INFLUENCES};

pub use glam::{Mat4, Vec2, Vec3};
