//! Scene backends
//!
//! The preview session talks to the renderer only through `SceneBackend`.
//! A backend owns the tessellated buffers of every attached model until
//! they are disposed.

use macroquad::prelude::*;

use super::model::Model;
use super::orbit::OrbitCamera;
use crate::ui::Rect;

/// Opaque id of one attached model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelHandle(u64);

impl ModelHandle {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

pub trait SceneBackend {
    /// Tessellate and keep the model's buffers, placed at `position`
    fn attach(&mut self, model: &Model, position: Vec3) -> ModelHandle;

    /// Release a model's buffers. Unknown handles are ignored.
    fn dispose(&mut self, handle: ModelHandle);

    /// Every model currently in the scene
    fn model_nodes(&self) -> Vec<ModelHandle>;

    fn render(&mut self, camera: &OrbitCamera, viewport: Rect);

    /// Number of live triangle buffers
    fn resident_buffers(&self) -> usize;
}

/// World-space triangles for one part
struct MeshBuffer {
    triangles: Vec<[Vec3; 3]>,
    color: Color,
}

struct SceneNode {
    handle: ModelHandle,
    buffers: Vec<MeshBuffer>,
}

/// Projects triangles through the orbit camera and paints them back to
/// front with macroquad's 2D triangle fill
pub struct TriangleBackend {
    nodes: Vec<SceneNode>,
    next_handle: u64,
    /// Reused between frames
    draw_list: Vec<(f32, [Vec2; 3], Color)>,
    pub background: Color,
}

impl Default for TriangleBackend {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            next_handle: 1,
            draw_list: Vec::new(),
            background: Color::from_rgba(25, 25, 35, 255),
        }
    }
}

impl TriangleBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Light from above and slightly in front of the model
fn shade(color: Color, tri: &[Vec3; 3]) -> Color {
    let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
    let light = vec3(0.4, 0.8, 0.45).normalize();
    let intensity = 0.35 + 0.65 * normal.dot(light).max(0.0);
    Color::new(color.r * intensity, color.g * intensity, color.b * intensity, color.a)
}

impl SceneBackend for TriangleBackend {
    fn attach(&mut self, model: &Model, position: Vec3) -> ModelHandle {
        let handle = ModelHandle::from_raw(self.next_handle);
        self.next_handle += 1;

        let buffers = model
            .parts
            .iter()
            .map(|part| MeshBuffer {
                triangles: part
                    .tessellate()
                    .into_iter()
                    .map(|tri| tri.map(|v| v + position))
                    .collect(),
                color: Color::from_rgba(part.color[0], part.color[1], part.color[2], 255),
            })
            .collect();
        self.nodes.push(SceneNode { handle, buffers });
        handle
    }

    fn dispose(&mut self, handle: ModelHandle) {
        self.nodes.retain(|node| node.handle != handle);
    }

    fn model_nodes(&self) -> Vec<ModelHandle> {
        self.nodes.iter().map(|node| node.handle).collect()
    }

    fn render(&mut self, camera: &OrbitCamera, viewport: Rect) {
        draw_rectangle(viewport.x, viewport.y, viewport.w, viewport.h, self.background);

        self.draw_list.clear();
        let eye = camera.position();
        for buffer in self.nodes.iter().flat_map(|node| node.buffers.iter()) {
            for tri in &buffer.triangles {
                // Back-face cull against the eye
                let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
                if normal.dot(eye - tri[0]) <= 0.0 {
                    continue;
                }
                let projected = [
                    camera.project(tri[0], viewport),
                    camera.project(tri[1], viewport),
                    camera.project(tri[2], viewport),
                ];
                if let [Some(a), Some(b), Some(c)] = projected {
                    let depth = (a.2 + b.2 + c.2) / 3.0;
                    let points = [vec2(a.0, a.1), vec2(b.0, b.1), vec2(c.0, c.1)];
                    self.draw_list.push((depth, points, shade(buffer.color, tri)));
                }
            }
        }

        // Painter's algorithm: farthest first
        self.draw_list.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, points, color) in &self.draw_list {
            let [a, b, c] = *points;
            draw_triangle(a, b, c, *color);
        }
    }

    fn resident_buffers(&self) -> usize {
        self.nodes.iter().map(|node| node.buffers.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::model::{Part, Shape};

    fn model(parts: usize) -> Model {
        Model::new(
            (0..parts)
                .map(|i| Part::new(Shape::Box, [1.0; 3], [0.0, i as f32, 0.0], [200, 100, 50]))
                .collect(),
        )
    }

    #[test]
    fn test_attach_dispose_tracks_buffers() {
        let mut backend = TriangleBackend::new();
        let a = backend.attach(&model(3), Vec3::ZERO);
        let b = backend.attach(&model(2), vec3(1.0, 0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(backend.model_nodes(), vec![a, b]);
        assert_eq!(backend.resident_buffers(), 5);

        backend.dispose(a);
        assert_eq!(backend.model_nodes(), vec![b]);
        assert_eq!(backend.resident_buffers(), 2);

        // Unknown handle
        backend.dispose(a);
        assert_eq!(backend.resident_buffers(), 2);
    }

    #[test]
    fn test_attach_applies_position() {
        let mut backend = TriangleBackend::new();
        backend.attach(&model(1), vec3(0.0, 0.0, -5.0));
        let tri = backend.nodes[0].buffers[0].triangles[0];
        for v in tri {
            assert!(v.z <= -4.5 + 1e-5 && v.z >= -5.5 - 1e-5);
        }
    }
}
