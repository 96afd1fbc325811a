//! Orbit camera model
//!
//! Continuous-parameter camera state: position, Euler angles in degrees,
//! orbit distance, and projection settings. Matrices use GL clip-space
//! conventions; the viewer shell applies its backend's clip-space
//! correction on top.

use glam::{Mat4, Vec3};

use super::CameraConfig;

/// Principal axis for a snap view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrthogonalDirection {
    Front,
    Right,
    Top,
}

/// Free-orbiting viewer camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Configuration
    pub config: CameraConfig,
    /// Orbit center in world space
    pub position: Vec3,
    /// Pitch in degrees (rotation about X)
    pub pitch: f32,
    /// Yaw in degrees (rotation about Y)
    pub yaw: f32,
    /// Roll in degrees (rotation about Z)
    pub roll: f32,
    /// Distance from the orbit center
    pub distance: f32,
    /// Viewport width / height
    pub aspect_ratio: f32,
    /// Perspective projection when true, orthogonal when false
    pub perspective: bool,
}

impl Camera {
    /// Create a camera with default config
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a camera with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            position: Vec3::new(0.0, 1.0, 4.0),
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            distance: 5.0,
            aspect_ratio: 1.0,
            perspective: true,
        }
    }

    /// Rotation-only matrix: pitch about X, then yaw about Y, then roll
    /// about Z.
    pub fn rotation(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_rotation_z(self.roll.to_radians())
    }

    /// View matrix: translate by the negative position, rotate, then back
    /// the camera off by the orbit distance as the outermost transform.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * self.rotation()
            * Mat4::from_translation(-self.position)
    }

    /// Projection matrix, near 0.1 and far 1000.
    ///
    /// The orthogonal box matches the perspective frustum's extent at the
    /// orbit distance, widened along the larger viewport axis.
    pub fn projection(&self) -> Mat4 {
        if self.perspective {
            Mat4::perspective_rh_gl(
                self.config.fov_y.to_radians(),
                self.aspect_ratio,
                0.1,
                1000.0,
            )
        } else {
            let length = (self.config.fov_y / 2.0).to_radians().tan() * self.distance.abs();
            if self.aspect_ratio >= 1.0 {
                Mat4::orthographic_rh_gl(
                    -length * self.aspect_ratio,
                    length * self.aspect_ratio,
                    -length,
                    length,
                    0.1,
                    1000.0,
                )
            } else {
                Mat4::orthographic_rh_gl(
                    -length,
                    length,
                    -length / self.aspect_ratio,
                    length / self.aspect_ratio,
                    0.1,
                    1000.0,
                )
            }
        }
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Orbit around the center. Always returns to perspective projection;
    /// only a snap view switches back to orthogonal.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.perspective = true;
        self.yaw -= dx * self.config.orbit_speed;
        self.pitch = (self.pitch - dy * self.config.orbit_speed)
            .clamp(self.config.pitch_min, self.config.pitch_max);
    }

    /// Pan in screen space. The step scales with the orbit distance, so a
    /// farther camera pans in bigger steps.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let speed = self.config.pan_speed * self.distance;
        let delta = Vec3::new(-dx * speed, dy * speed, 0.0);
        self.position += (self.rotation().inverse() * delta.extend(0.0)).truncate();
    }

    /// Move the orbit center by a velocity expressed in view space.
    pub fn translate(&mut self, velocity: Vec3) {
        self.position += (self.rotation().inverse() * velocity.extend(0.0)).truncate();
    }

    /// Change the orbit distance, clamped to the configured range.
    pub fn dolly(&mut self, amount: f32) {
        self.distance =
            (self.distance + amount).clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Snap to an axis-aligned orthogonal view.
    pub fn orthogonal(&mut self, direction: OrthogonalDirection, opposite: bool) {
        self.perspective = false;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.roll = 0.0;
        match direction {
            OrthogonalDirection::Front => self.yaw = if opposite { 180.0 } else { 0.0 },
            OrthogonalDirection::Right => self.yaw = if opposite { -90.0 } else { 90.0 },
            OrthogonalDirection::Top => self.pitch = if opposite { 90.0 } else { -90.0 },
        }
    }

    /// Center the camera on a point.
    pub fn focus(&mut self, point: Vec3) {
        // TODO: confirm whether the distance should be measured from the
        // position before the move; as written it always collapses to zero.
        self.position = point;
        self.distance = self.position.distance(point);
    }

    /// Update the aspect ratio from viewport dimensions. A zero height
    /// falls back to square rather than failing.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = if height != 0.0 { width / height } else { 1.0 };
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
