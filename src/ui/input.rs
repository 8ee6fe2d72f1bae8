//! Input state for UI interaction

use macroquad::prelude::*;

use super::Rect;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool, // Just pressed this frame
    pub scroll: f32,        // Scroll wheel delta
}

impl MouseState {
    /// Sample macroquad's mouse for this frame
    pub fn capture() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            scroll: mouse_wheel().1,
        }
    }

    /// Check if mouse is inside a rect
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Check if mouse is clicking inside a rect
    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Check if mouse just clicked inside a rect
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
#[derive(Debug, Default)]
pub struct UiContext {
    pub mouse: MouseState,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
    }
}
