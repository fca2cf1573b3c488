use glam::Vec2;

/// Pointer state tracked by the host window.
///
/// Positions arrive in window pixels (origin top-left, y down); the avatar
/// consumes them as normalized device coordinates through
/// [`pointer_ndc`](Self::pointer_ndc).
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Current cursor position inside the window, in pixels
    pub cursor_position: Vec2,
    /// Cursor movement since the previous frame (dx, dy)
    pub cursor_delta: Vec2,
    /// Window size in pixels
    pub screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// End-of-frame cleanup (clears per-frame deltas).
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        // No delta on the very first event
        if self.cursor_position != Vec2::ZERO {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
    }

    /// Cursor position in normalized device coordinates.
    ///
    /// `x` spans -1 (left) to +1 (right), `y` spans -1 (bottom) to +1 (top).
    /// Returns the origin while the window size is unknown.
    #[must_use]
    pub fn pointer_ndc(&self) -> Vec2 {
        if self.screen_size.x <= 0.0 || self.screen_size.y <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (self.cursor_position.x / self.screen_size.x) * 2.0 - 1.0,
            -(self.cursor_position.y / self.screen_size.y) * 2.0 + 1.0,
        )
    }
}
