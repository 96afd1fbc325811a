//! Camera configuration

use serde::{Deserialize, Serialize};

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Minimum dolly distance
    pub min_distance: f32,
    /// Maximum dolly distance
    pub max_distance: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Degrees of rotation per unit of orbit delta
    pub orbit_speed: f32,
    /// Pan step per unit of delta, scaled by the current distance
    pub pan_speed: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            max_distance: 1500.0,
            fov_y: 45.0,
            orbit_speed: 0.5,
            pan_speed: 0.01,
            pitch_min: -89.0,
            pitch_max: 89.0,
        }
    }
}
