//! Character generators
//!
//! Each character id maps to something that can build its model. Built-in
//! characters register procedural builders at startup; loaded scripts
//! register their part lists as they arrive.

use log::debug;
use std::collections::HashMap;

use super::model::{Model, Part, Shape};
use crate::roster::CharacterId;

pub trait CharacterGenerator {
    fn build(&self) -> Model;
}

impl<F: Fn() -> Model> CharacterGenerator for F {
    fn build(&self) -> Model {
        self()
    }
}

/// Generator backed by a loaded character script
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    model: Model,
}

impl ScriptedGenerator {
    pub fn new(model: Model) -> Self {
        Self { model }
    }
}

impl CharacterGenerator for ScriptedGenerator {
    fn build(&self) -> Model {
        self.model.clone()
    }
}

#[derive(Default)]
pub struct GeneratorRegistry {
    generators: HashMap<CharacterId, Box<dyn CharacterGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the generator for `id`
    pub fn register(&mut self, id: CharacterId, generator: Box<dyn CharacterGenerator>) {
        debug!("Registered generator for {}", id);
        self.generators.insert(id, generator);
    }

    pub fn get(&self, id: &CharacterId) -> Option<&dyn CharacterGenerator> {
        self.generators.get(id).map(|g| g.as_ref())
    }

    pub fn contains(&self, id: &CharacterId) -> bool {
        self.generators.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

fn part(shape: Shape, size: [f32; 3], offset: [f32; 3], color: [u8; 3]) -> Part {
    Part::new(shape, size, offset, color)
}

const WHITE: [u8; 3] = [240, 240, 240];
const BLACK: [u8; 3] = [20, 20, 24];

fn eyes(y: f32, z: f32, spread: f32, size: f32) -> [Part; 2] {
    [
        part(Shape::Sphere, [size; 3], [-spread, y, z], BLACK),
        part(Shape::Sphere, [size; 3], [spread, y, z], BLACK),
    ]
}

fn happyface() -> Model {
    let mut parts = vec![part(Shape::Sphere, [1.6; 3], [0.0, 0.8, 0.0], [250, 210, 40])];
    parts.extend(eyes(1.0, 0.68, 0.25, 0.18));
    parts.push(part(Shape::Box, [0.6, 0.08, 0.1], [0.0, 0.55, 0.72], BLACK));
    Model::new(parts)
}

fn ghost() -> Model {
    let mut parts = vec![
        part(Shape::Sphere, [1.4; 3], [0.0, 1.3, 0.0], WHITE),
        part(Shape::Cylinder, [1.4, 1.2, 1.4], [0.0, 0.6, 0.0], WHITE),
    ];
    parts.extend(eyes(1.45, 0.6, 0.22, 0.2));
    Model::new(parts)
}

fn robot() -> Model {
    let steel = [150, 160, 175];
    let mut parts = vec![
        part(Shape::Box, [1.2, 1.2, 0.8], [0.0, 0.9, 0.0], steel),
        part(Shape::Box, [0.8, 0.6, 0.6], [0.0, 1.85, 0.0], steel),
        part(Shape::Cylinder, [0.06, 0.4, 0.06], [0.0, 2.35, 0.0], [90, 90, 100]),
        part(Shape::Sphere, [0.15; 3], [0.0, 2.6, 0.0], [230, 60, 60]),
        part(Shape::Box, [0.3, 0.3, 0.3], [-0.35, 0.15, 0.0], [90, 90, 100]),
        part(Shape::Box, [0.3, 0.3, 0.3], [0.35, 0.15, 0.0], [90, 90, 100]),
    ];
    parts.extend(eyes(1.9, 0.31, 0.18, 0.14));
    Model::new(parts)
}

fn dragon() -> Model {
    let green = [70, 160, 80];
    let mut parts = vec![
        part(Shape::Sphere, [1.2, 1.0, 1.6], [0.0, 0.7, 0.0], green),
        part(Shape::Sphere, [0.8; 3], [0.0, 1.4, 0.7], green),
        part(Shape::Cone, [0.2, 0.4, 0.2], [-0.2, 1.9, 0.6], [240, 220, 160]),
        part(Shape::Cone, [0.2, 0.4, 0.2], [0.2, 1.9, 0.6], [240, 220, 160]),
        part(Shape::Box, [1.0, 0.05, 0.6], [-0.8, 1.0, -0.1], [50, 120, 60]),
        part(Shape::Box, [1.0, 0.05, 0.6], [0.8, 1.0, -0.1], [50, 120, 60]),
        part(Shape::Cone, [0.4, 0.9, 0.4], [0.0, 0.5, -1.0], green),
    ];
    parts.extend(eyes(1.5, 1.05, 0.18, 0.12));
    Model::new(parts)
}

fn alien() -> Model {
    let skin = [140, 220, 120];
    let mut parts = vec![
        part(Shape::Cylinder, [0.6, 1.0, 0.6], [0.0, 0.5, 0.0], skin),
        part(Shape::Sphere, [1.2, 1.0, 1.0], [0.0, 1.5, 0.0], skin),
        part(Shape::Cylinder, [0.05, 0.5, 0.05], [0.0, 2.2, 0.0], skin),
        part(Shape::Sphere, [0.18; 3], [0.0, 2.5, 0.0], [250, 120, 200]),
    ];
    parts.extend(eyes(1.55, 0.45, 0.25, 0.3));
    Model::new(parts)
}

fn unicorn() -> Model {
    let coat = [245, 235, 250];
    Model::new(vec![
        part(Shape::Box, [0.8, 0.7, 1.5], [0.0, 0.9, 0.0], coat),
        part(Shape::Box, [0.5, 0.6, 0.7], [0.0, 1.5, 0.8], coat),
        part(Shape::Cone, [0.12, 0.6, 0.12], [0.0, 2.1, 0.9], [250, 210, 80]),
        part(Shape::Cylinder, [0.18, 0.6, 0.18], [-0.25, 0.3, 0.5], coat),
        part(Shape::Cylinder, [0.18, 0.6, 0.18], [0.25, 0.3, 0.5], coat),
        part(Shape::Cylinder, [0.18, 0.6, 0.18], [-0.25, 0.3, -0.5], coat),
        part(Shape::Cylinder, [0.18, 0.6, 0.18], [0.25, 0.3, -0.5], coat),
        part(Shape::Box, [0.1, 0.7, 0.5], [0.0, 1.6, 0.3], [200, 120, 230]),
    ])
}

fn ninja() -> Model {
    let cloth = [35, 35, 45];
    Model::new(vec![
        part(Shape::Box, [0.8, 1.1, 0.5], [0.0, 0.85, 0.0], cloth),
        part(Shape::Sphere, [0.7; 3], [0.0, 1.75, 0.0], cloth),
        part(Shape::Box, [0.6, 0.12, 0.1], [0.0, 1.78, 0.32], [230, 200, 170]),
        part(Shape::Box, [0.75, 0.08, 0.75], [0.0, 1.95, 0.0], [200, 30, 40]),
        part(Shape::Box, [0.08, 1.2, 0.08], [0.3, 1.0, -0.3], [120, 120, 130]),
    ])
}

fn wizard() -> Model {
    let robe = [70, 60, 170];
    Model::new(vec![
        part(Shape::Cone, [1.1, 1.6, 1.1], [0.0, 0.8, 0.0], robe),
        part(Shape::Sphere, [0.6; 3], [0.0, 1.8, 0.0], [240, 210, 180]),
        part(Shape::Cone, [0.3, 0.5, 0.3], [0.0, 1.55, 0.25], WHITE),
        part(Shape::Cylinder, [1.0, 0.06, 1.0], [0.0, 2.08, 0.0], robe),
        part(Shape::Cone, [0.6, 0.9, 0.6], [0.0, 2.55, 0.0], robe),
    ])
}

fn pirate() -> Model {
    Model::new(vec![
        part(Shape::Cylinder, [0.8, 1.2, 0.8], [0.0, 0.6, 0.0], [150, 40, 40]),
        part(Shape::Sphere, [0.7; 3], [0.0, 1.55, 0.0], [230, 190, 150]),
        part(Shape::Box, [0.9, 0.2, 0.5], [0.0, 1.95, 0.0], [30, 30, 30]),
        part(Shape::Box, [0.2, 0.16, 0.05], [0.15, 1.62, 0.34], [30, 30, 30]),
        part(Shape::Cylinder, [0.15, 0.4, 0.15], [0.2, 0.2, 0.0], [120, 80, 40]),
    ])
}

fn cactus() -> Model {
    let green = [60, 150, 70];
    Model::new(vec![
        part(Shape::Cylinder, [0.6, 2.0, 0.6], [0.0, 1.0, 0.0], green),
        part(Shape::Sphere, [0.6; 3], [0.0, 2.0, 0.0], green),
        part(Shape::Cylinder, [0.3, 0.7, 0.3], [-0.55, 1.2, 0.0], green),
        part(Shape::Cylinder, [0.3, 0.5, 0.3], [0.55, 1.4, 0.0], green),
        part(Shape::Cylinder, [0.7, 0.4, 0.7], [0.0, 0.2, 0.0], [190, 100, 60]),
    ])
}

/// Register a builder for every built-in character
pub fn register_builtin_generators(registry: &mut GeneratorRegistry) {
    let builders: [(&str, fn() -> Model); 10] = [
        ("happyface", happyface),
        ("ghost", ghost),
        ("robot", robot),
        ("dragon", dragon),
        ("alien", alien),
        ("unicorn", unicorn),
        ("ninja", ninja),
        ("wizard", wizard),
        ("pirate", pirate),
        ("cactus", cactus),
    ];
    for (name, build) in builders {
        if let Ok(id) = CharacterId::parse(name) {
            registry.register(id, Box::new(build));
        }
    }
}
