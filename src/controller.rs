//! Camera controller
//!
//! Applies a frame's `InputState` to the camera: mouse drags become
//! orbit/pan/dolly, the wheel dollies, WASD translates the orbit center,
//! and the snap keys select orthogonal views (opposite view while the
//! modifier is held).

use glam::Vec3;
use meshview_render::{Camera, OrthogonalDirection};

use crate::input::{DragMode, InputState, ViewerAction};

/// Units moved per second by the WASD keys.
const MOVE_SPEED: f32 = 3.0;
/// Speed multiplier while sprinting.
const SPRINT_MULTIPLIER: f32 = 4.0;
/// Distance change per unit of scroll delta.
const WHEEL_DOLLY_SPEED: f32 = 1.0;
/// Distance change per pixel of vertical drag in dolly mode.
const DRAG_DOLLY_SPEED: f32 = 0.1;

/// Maps input state onto camera operations.
pub struct CameraController {
    /// The driven camera
    pub camera: Camera,
    focus_target: Vec3,
}

impl CameraController {
    /// Create a controller with a default camera
    pub fn new() -> Self {
        Self::with_camera(Camera::new())
    }

    /// Create a controller driving the given camera
    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            focus_target: Vec3::ZERO,
        }
    }

    /// Point the focus action centers on.
    pub fn set_focus_target(&mut self, point: Vec3) {
        self.focus_target = point;
    }

    /// Apply one frame of input.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        match input.drag {
            Some(DragMode::Orbit) => {
                self.camera.orbit(input.mouse_delta.x, input.mouse_delta.y);
            }
            Some(DragMode::Pan) => {
                self.camera.pan(input.mouse_delta.x, input.mouse_delta.y);
            }
            Some(DragMode::Dolly) => {
                self.camera.dolly(input.mouse_delta.y * DRAG_DOLLY_SPEED);
            }
            None => {}
        }

        if input.scroll_delta != 0.0 {
            self.camera.dolly(-input.scroll_delta * WHEEL_DOLLY_SPEED);
        }

        let mut velocity = Vec3::ZERO;
        if input.is_held(ViewerAction::MoveForward) {
            velocity.z -= 1.0;
        }
        if input.is_held(ViewerAction::MoveBackward) {
            velocity.z += 1.0;
        }
        if input.is_held(ViewerAction::MoveLeft) {
            velocity.x -= 1.0;
        }
        if input.is_held(ViewerAction::MoveRight) {
            velocity.x += 1.0;
        }
        if velocity != Vec3::ZERO {
            let mut speed = MOVE_SPEED;
            if input.is_held(ViewerAction::Sprint) {
                speed *= SPRINT_MULTIPLIER;
            }
            self.camera.translate(velocity.normalize() * speed * dt);
        }

        let opposite = input.is_held(ViewerAction::OppositeView);
        if input.is_just_pressed(ViewerAction::SnapFront) {
            self.camera.orthogonal(OrthogonalDirection::Front, opposite);
        }
        if input.is_just_pressed(ViewerAction::SnapRight) {
            self.camera.orthogonal(OrthogonalDirection::Right, opposite);
        }
        if input.is_just_pressed(ViewerAction::SnapTop) {
            self.camera.orthogonal(OrthogonalDirection::Top, opposite);
        }
        if input.is_just_pressed(ViewerAction::FocusObject) {
            self.camera.focus(self.focus_target);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_orbit_drag_turns_camera() {
        let mut controller = CameraController::new();
        let mut input = InputState::new();
        input.drag = Some(DragMode::Orbit);
        input.mouse_delta = Vec2::new(10.0, 0.0);
        controller.update(&input, 1.0 / 60.0);
        assert_eq!(controller.camera.yaw, -5.0);
    }

    #[test]
    fn test_wheel_dollies_out() {
        let mut controller = CameraController::new();
        let mut input = InputState::new();
        input.scroll_delta = -20.0;
        controller.update(&input, 1.0 / 60.0);
        assert_eq!(controller.camera.distance, 25.0);
    }

    #[test]
    fn test_snap_with_modifier_selects_opposite() {
        let mut controller = CameraController::new();
        let mut input = InputState::new();
        input.press(ViewerAction::OppositeView);
        input.press(ViewerAction::SnapRight);
        controller.update(&input, 1.0 / 60.0);
        assert!(!controller.camera.perspective);
        assert_eq!(controller.camera.yaw, -90.0);
    }

    #[test]
    fn test_sprint_scales_movement() {
        let mut walk = CameraController::new();
        let mut run = CameraController::new();
        walk.camera.position = Vec3::ZERO;
        run.camera.position = Vec3::ZERO;

        let mut input = InputState::new();
        input.press(ViewerAction::MoveForward);
        walk.update(&input, 1.0);
        input.press(ViewerAction::Sprint);
        run.update(&input, 1.0);

        let walked = walk.camera.position.length();
        let ran = run.camera.position.length();
        assert!((ran - walked * SPRINT_MULTIPLIER).abs() < 1e-5);
    }

    #[test]
    fn test_focus_uses_target() {
        let mut controller = CameraController::new();
        controller.set_focus_target(Vec3::new(1.0, 2.0, 3.0));
        let mut input = InputState::new();
        input.press(ViewerAction::FocusObject);
        controller.update(&input, 1.0 / 60.0);
        assert_eq!(controller.camera.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
