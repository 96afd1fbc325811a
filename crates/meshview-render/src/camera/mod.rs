//! Orbit camera module
//!
//! Provides the free-orbiting viewer camera with perspective and orthogonal
//! projection and axis-aligned snap views.

mod config;
mod model;

pub use config::CameraConfig;
pub use model::{Camera, OrthogonalDirection};
