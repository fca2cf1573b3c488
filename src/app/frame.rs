use glam::{Vec2, Vec3};

use crate::app::input::Input;
use crate::utils::time::Timer;

/// Per-frame state handed to the avatar by the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds elapsed since the previous rendered frame
    pub delta: f32,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Pointer position in normalized device coordinates
    pub pointer: Vec2,
}

impl FrameState {
    #[must_use]
    pub fn new(delta: f32, camera_position: Vec3, pointer: Vec2) -> Self {
        Self {
            delta,
            camera_position,
            pointer,
        }
    }

    /// Builds the frame state from the host's clock and input trackers.
    #[must_use]
    pub fn capture(timer: &Timer, input: &Input, camera_position: Vec3) -> Self {
        Self {
            delta: timer.dt_seconds(),
            camera_position,
            pointer: input.pointer_ndc(),
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            delta: 0.0,
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            pointer: Vec2::ZERO,
        }
    }
}
