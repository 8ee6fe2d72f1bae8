//! Preview Session
//!
//! One reusable scene that shows the selected character. The session owns
//! a single model slot: every load disposes the current model (and sweeps
//! any stray nodes) before anything else is attached, so however many
//! characters are previewed only one model's buffers stay resident.
//!
//! Loads are fire-and-poll. `load_character` starts a load, `poll` advances
//! it as scripts arrive, and a newer `load_character` supersedes whatever
//! was in flight.

pub mod backend;
pub mod generator;
pub mod model;
pub mod orbit;
pub mod scripts;

pub use backend::{ModelHandle, SceneBackend, TriangleBackend};
pub use generator::{register_builtin_generators, CharacterGenerator, GeneratorRegistry, ScriptedGenerator};
pub use model::{Model, Part, Shape};
pub use orbit::{OrbitCamera, OrbitInput};
pub use scripts::{scan_scripts, BundledScripts, CharacterScript, ScanReport, ScriptLoader, ScriptOutcome, ScriptSource};

use log::{debug, info, warn};
use macroquad::math::Vec3;

use crate::roster::{CharacterDescriptor, CharacterId};
use crate::ui::Rect;

/// Where models stand in the preview scene
pub const VIEW_OFFSET: Vec3 = Vec3::ZERO;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("no generator for {0}")]
    GeneratorUnavailable(CharacterId),
    #[error("could not load script: {0}")]
    ScriptLoad(String),
    #[error("invalid script: {0}")]
    ScriptParse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Empty,
    Loading { id: CharacterId },
    Displaying { id: CharacterId },
    Unavailable { id: CharacterId, reason: PreviewError },
    Disposed,
}

pub struct PreviewSession<B: SceneBackend, S: ScriptSource> {
    backend: B,
    loader: ScriptLoader<S>,
    registry: GeneratorRegistry,
    camera: OrbitCamera,
    state: PreviewState,
    current: Option<ModelHandle>,
    /// Per-frame render loop is running
    looping: bool,
}

impl<B: SceneBackend, S: ScriptSource> PreviewSession<B, S> {
    pub fn new(backend: B, source: S, registry: GeneratorRegistry) -> Self {
        Self {
            backend,
            loader: ScriptLoader::new(source),
            registry,
            camera: OrbitCamera::default(),
            state: PreviewState::Empty,
            current: None,
            looping: false,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn source(&self) -> &S {
        self.loader.source()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Drop the current model and anything else left in the scene
    fn release_models(&mut self) {
        self.looping = false;
        if let Some(handle) = self.current.take() {
            self.backend.dispose(handle);
        }
        let orphans = self.backend.model_nodes();
        if !orphans.is_empty() {
            warn!("Disposing {} orphaned preview model(s)", orphans.len());
            for handle in orphans {
                self.backend.dispose(handle);
            }
        }
    }

    /// Show a character, superseding any load still in flight
    pub fn load_character(&mut self, id: &CharacterId) {
        if self.state == PreviewState::Disposed {
            warn!("Preview already torn down, ignoring load of {}", id);
            return;
        }
        self.release_models();
        self.state = PreviewState::Loading { id: id.clone() };
        debug!("Preview loading {}", id);

        if self.registry.contains(id) {
            self.show(id.clone());
        } else if self.loader.is_loaded(id) {
            // Script ran but registered nothing under this id
            self.fail(id.clone(), PreviewError::GeneratorUnavailable(id.clone()));
        } else {
            self.loader.request(id);
        }
    }

    /// Advance pending script loads. Returns catalog metadata from scripts
    /// that arrived, for the caller to merge.
    pub fn poll(&mut self) -> Vec<CharacterDescriptor> {
        let mut discovered = Vec::new();
        for (id, outcome) in self.loader.poll() {
            let waiting = matches!(&self.state, PreviewState::Loading { id: current } if current == &id);
            match outcome {
                ScriptOutcome::Loaded(script) => {
                    if script.meta.is_some() {
                        discovered.push(script.descriptor());
                    }
                    self.registry
                        .register(script.id.clone(), Box::new(ScriptedGenerator::new(script.model())));
                    if !waiting {
                        debug!("Script for {} arrived after being superseded", id);
                    } else if self.registry.contains(&id) {
                        self.show(id);
                    } else {
                        self.fail(id.clone(), PreviewError::GeneratorUnavailable(id));
                    }
                }
                ScriptOutcome::Missing if waiting => {
                    self.fail(id.clone(), PreviewError::GeneratorUnavailable(id));
                }
                ScriptOutcome::Failed(reason) if waiting => self.fail(id, reason),
                ScriptOutcome::Missing | ScriptOutcome::Failed(_) => {}
            }
        }
        discovered
    }

    fn show(&mut self, id: CharacterId) {
        let Some(generator) = self.registry.get(&id) else {
            self.fail(id.clone(), PreviewError::GeneratorUnavailable(id));
            return;
        };
        let model = generator.build();
        self.camera.frame_model(VIEW_OFFSET, model.top());
        self.current = Some(self.backend.attach(&model, VIEW_OFFSET));
        self.looping = true;
        info!("Previewing {} ({} parts)", id, model.parts.len());
        self.state = PreviewState::Displaying { id };
    }

    fn fail(&mut self, id: CharacterId, reason: PreviewError) {
        warn!("Preview of {} unavailable: {}", id, reason);
        self.state = PreviewState::Unavailable { id, reason };
    }

    /// One frame of orbit interaction and rendering. Does nothing unless a
    /// model is on display.
    pub fn frame(&mut self, dt: f32, input: &OrbitInput, viewport: Rect) {
        if !self.looping {
            return;
        }
        self.camera.handle_input(input, viewport);
        self.camera.update(dt);
        self.backend.render(&self.camera, viewport);
    }

    /// Read scripts from a different place. The scene backend stays; models,
    /// pending reads and scripted generators from the old source are dropped
    /// and `registry` takes over.
    pub fn switch_source(&mut self, source: S, registry: GeneratorRegistry) {
        if self.state == PreviewState::Disposed {
            warn!("Preview already torn down, ignoring source change");
            return;
        }
        self.release_models();
        self.loader = ScriptLoader::new(source);
        self.registry = registry;
        self.state = PreviewState::Empty;
        info!("Preview script source replaced");
    }

    /// Stop for good and release every model
    pub fn teardown(&mut self) {
        self.release_models();
        self.loader.cancel_all();
        self.state = PreviewState::Disposed;
        debug!("Preview torn down");
    }
}
