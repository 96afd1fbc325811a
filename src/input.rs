//! Input state consumed by the camera controller
//!
//! The windowing layer translates its native events into this per-frame
//! snapshot; the controller only ever sees actions and numeric deltas.

use std::collections::HashSet;

use glam::Vec2;

/// Viewer actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Sprint modifier (Shift by default)
    Sprint,
    /// Focus the camera on the object (F by default)
    FocusObject,
    /// Snap to the front view (1 by default)
    SnapFront,
    /// Snap to the right view (3 by default)
    SnapRight,
    /// Snap to the top view (7 by default)
    SnapTop,
    /// Select the opposite snap view while held (Ctrl by default)
    OppositeView,
}

/// Mouse drag modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Orbit around the center (right button by default)
    Orbit,
    /// Pan in screen space (left button by default)
    Pan,
    /// Dolly along the view axis (middle button by default)
    Dolly,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<ViewerAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<ViewerAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
    /// Scroll wheel delta for this frame
    pub scroll_delta: f32,
    /// Active mouse drag, if any button is down
    pub drag: Option<DragMode>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: ViewerAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: ViewerAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Record an action press
    pub fn press(&mut self, action: ViewerAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Record an action release
    pub fn release(&mut self, action: ViewerAction) {
        self.held.remove(&action);
    }

    /// Clear the per-frame deltas after the controller has consumed them
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}
