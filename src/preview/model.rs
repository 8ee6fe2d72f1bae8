//! Character models
//!
//! A model is a list of primitive parts. Scene backends tessellate each
//! part into one triangle buffer, so a model's resource footprint is its
//! part count.

use macroquad::math::{vec3, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Box,
    Sphere,
    Cylinder,
    Cone,
}

/// One primitive. `size` is the full extent on each axis; `offset` is the
/// part center relative to the model origin (y up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub shape: Shape,
    pub size: [f32; 3],
    #[serde(default)]
    pub offset: [f32; 3],
    pub color: [u8; 3],
}

impl Part {
    pub fn new(shape: Shape, size: [f32; 3], offset: [f32; 3], color: [u8; 3]) -> Self {
        Self {
            shape,
            size,
            offset,
            color,
        }
    }

    /// Triangles in model space
    pub fn tessellate(&self) -> Vec<[Vec3; 3]> {
        let half = Vec3::from(self.size) * 0.5;
        let center = Vec3::from(self.offset);
        let local = match self.shape {
            Shape::Box => box_triangles(),
            Shape::Sphere => sphere_triangles(SPHERE_RINGS, SPHERE_SEGMENTS),
            Shape::Cylinder => lathe_triangles(1.0, SEGMENTS),
            Shape::Cone => lathe_triangles(0.0, SEGMENTS),
        };
        local
            .into_iter()
            .map(|tri| tri.map(|v| center + v * half))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub parts: Vec<Part>,
}

impl Model {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Height of the tallest point above the origin
    pub fn top(&self) -> f32 {
        self.parts
            .iter()
            .map(|p| p.offset[1] + p.size[1] * 0.5)
            .fold(0.0, f32::max)
    }
}

const SEGMENTS: usize = 12;
const SPHERE_RINGS: usize = 6;
const SPHERE_SEGMENTS: usize = 10;

/// Unit cube spanning -1..1
fn box_triangles() -> Vec<[Vec3; 3]> {
    let c = |x: f32, y: f32, z: f32| vec3(x, y, z);
    let corners = [
        c(-1.0, -1.0, -1.0),
        c(1.0, -1.0, -1.0),
        c(1.0, 1.0, -1.0),
        c(-1.0, 1.0, -1.0),
        c(-1.0, -1.0, 1.0),
        c(1.0, -1.0, 1.0),
        c(1.0, 1.0, 1.0),
        c(-1.0, 1.0, 1.0),
    ];
    // Quads wound counter-clockwise seen from outside
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // +z
        [1, 0, 3, 2], // -z
        [5, 1, 2, 6], // +x
        [0, 4, 7, 3], // -x
        [7, 6, 2, 3], // +y
        [0, 1, 5, 4], // -y
    ];
    faces
        .iter()
        .flat_map(|f| {
            [
                [corners[f[0]], corners[f[1]], corners[f[2]]],
                [corners[f[0]], corners[f[2]], corners[f[3]]],
            ]
        })
        .collect()
}

/// Unit sphere (radius 1)
fn sphere_triangles(rings: usize, segments: usize) -> Vec<[Vec3; 3]> {
    let point = |ring: usize, seg: usize| {
        let theta = PI * ring as f32 / rings as f32;
        let phi = TAU * seg as f32 / segments as f32;
        vec3(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    };
    let mut tris = Vec::with_capacity(rings * segments * 2);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = point(ring, seg);
            let b = point(ring + 1, seg);
            let c = point(ring + 1, seg + 1);
            let d = point(ring, seg + 1);
            if ring != 0 {
                tris.push([a, d, c]);
            }
            if ring != rings - 1 {
                tris.push([a, c, b]);
            }
        }
    }
    tris
}

/// Cylinder (`top_radius` 1) or cone (`top_radius` 0) along y, -1..1
fn lathe_triangles(top_radius: f32, segments: usize) -> Vec<[Vec3; 3]> {
    let rim = |radius: f32, y: f32, seg: usize| {
        let phi = TAU * seg as f32 / segments as f32;
        vec3(radius * phi.cos(), y, radius * phi.sin())
    };
    let top = vec3(0.0, 1.0, 0.0);
    let bottom = vec3(0.0, -1.0, 0.0);
    let mut tris = Vec::new();
    for seg in 0..segments {
        let b0 = rim(1.0, -1.0, seg);
        let b1 = rim(1.0, -1.0, seg + 1);
        let t0 = rim(top_radius, 1.0, seg);
        let t1 = rim(top_radius, 1.0, seg + 1);
        tris.push([b0, t0, t1]);
        if top_radius > 0.0 {
            tris.push([b0, t1, b1]);
            tris.push([top, t1, t0]);
        } else {
            tris.push([b0, top, b1]);
        }
        tris.push([bottom, b0, b1]);
    }
    tris
}
