//! Orbit camera for the preview panel
//!
//! Drag to rotate, scroll to zoom. When nobody is dragging the camera
//! slowly spins around the model.

use macroquad::math::{vec3, Vec3};

use crate::ui::Rect;

/// Radians per pixel of drag
const DRAG_SPEED: f32 = 0.01;
const PITCH_LIMIT: f32 = 1.4;
const MIN_DISTANCE: f32 = 1.5;
const MAX_DISTANCE: f32 = 40.0;
/// Idle spin in radians per second
const AUTO_SPIN: f32 = 0.4;
const NEAR: f32 = 0.1;

/// Mouse state the camera cares about, sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitInput {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub scroll: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub center: Vec3,
    dragging: bool,
    last_mouse: (f32, f32),
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.5,
            pitch: 0.3,
            distance: 6.0,
            center: vec3(0.0, 1.0, 0.0),
            dragging: false,
            last_mouse: (0.0, 0.0),
        }
    }
}

impl OrbitCamera {
    /// Aim at a model standing at `origin` and `height` tall
    pub fn frame_model(&mut self, origin: Vec3, height: f32) {
        let height = height.max(0.5);
        self.center = origin + vec3(0.0, height * 0.5, 0.0);
        self.distance = (height * 2.5).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.yaw = 0.8;
        self.pitch = 0.3;
    }

    /// Apply one frame of mouse input. Input outside the viewport only ends
    /// a drag.
    pub fn handle_input(&mut self, input: &OrbitInput, viewport: Rect) {
        if !viewport.contains(input.x, input.y) {
            self.dragging = false;
            return;
        }

        if input.left_down {
            if self.dragging {
                let dx = input.x - self.last_mouse.0;
                let dy = input.y - self.last_mouse.1;
                self.yaw += dx * DRAG_SPEED;
                self.pitch = (self.pitch + dy * DRAG_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            self.dragging = true;
            self.last_mouse = (input.x, input.y);
        } else {
            self.dragging = false;
        }

        if input.scroll != 0.0 {
            let zoom_factor = if input.scroll > 0.0 { 0.9 } else { 1.1 };
            self.distance = (self.distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Advance idle animation
    pub fn update(&mut self, dt: f32) {
        if !self.dragging {
            self.yaw = (self.yaw + AUTO_SPIN * dt) % std::f32::consts::TAU;
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.center
            + vec3(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    /// Camera basis as (right, up, forward)
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.center - self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Project a world point into the viewport. Returns screen x, y and the
    /// camera-space depth, or `None` behind the near plane.
    pub fn project(&self, world: Vec3, viewport: Rect) -> Option<(f32, f32, f32)> {
        let (right, up, forward) = self.basis();
        let rel = world - self.position();
        let depth = rel.dot(forward);
        if depth <= NEAR {
            return None;
        }
        let scale = viewport.w.min(viewport.h) * 0.9;
        let sx = viewport.center_x() + rel.dot(right) / depth * scale;
        let sy = viewport.center_y() - rel.dot(up) / depth * scale;
        Some((sx, sy, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    fn at(x: f32, y: f32, left_down: bool) -> OrbitInput {
        OrbitInput {
            x,
            y,
            left_down,
            scroll: 0.0,
        }
    }

    #[test]
    fn test_drag_rotates_and_clamps_pitch() {
        let mut cam = OrbitCamera::default();
        let yaw = cam.yaw;
        cam.handle_input(&at(50.0, 50.0, true), viewport());
        cam.handle_input(&at(60.0, 50.0, true), viewport());
        assert!((cam.yaw - (yaw + 0.1)).abs() < 1e-5);

        cam.handle_input(&at(60.0, 99.0, true), viewport());
        cam.handle_input(&at(60.0, 0.0, true), viewport());
        cam.handle_input(&at(60.0, 99.0, true), viewport());
        cam.handle_input(&at(60.0, 99.0, true), viewport());
        assert!(cam.pitch <= PITCH_LIMIT && cam.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn test_leaving_viewport_ends_drag() {
        let mut cam = OrbitCamera::default();
        cam.handle_input(&at(50.0, 50.0, true), viewport());
        assert!(cam.dragging);
        cam.handle_input(&at(500.0, 50.0, true), viewport());
        assert!(!cam.dragging);
    }

    #[test]
    fn test_zoom_is_multiplicative_and_clamped() {
        let mut cam = OrbitCamera::default();
        let mut input = at(10.0, 10.0, false);
        input.scroll = 1.0;
        cam.handle_input(&input, viewport());
        assert!((cam.distance - 5.4).abs() < 1e-4);
        for _ in 0..100 {
            cam.handle_input(&input, viewport());
        }
        assert_eq!(cam.distance, MIN_DISTANCE);
    }

    #[test]
    fn test_auto_spin_only_when_idle() {
        let mut cam = OrbitCamera::default();
        let yaw = cam.yaw;
        cam.update(1.0);
        assert!((cam.yaw - (yaw + AUTO_SPIN)).abs() < 1e-5);

        cam.handle_input(&at(50.0, 50.0, true), viewport());
        let yaw = cam.yaw;
        cam.update(1.0);
        assert_eq!(cam.yaw, yaw);
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let cam = OrbitCamera::default();
        let (x, y, depth) = cam.project(cam.center, viewport()).unwrap();
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
        assert!((depth - cam.distance).abs() < 1e-3);
        // Above the center lands higher on screen
        let (_, y_up, _) = cam.project(cam.center + Vec3::Y, viewport()).unwrap();
        assert!(y_up < y);
        // Behind the camera
        assert!(cam.project(cam.position() * 2.0 - cam.center, viewport()).is_none());
    }
}
