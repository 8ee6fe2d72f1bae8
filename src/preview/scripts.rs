//! Character scripts
//!
//! A character that isn't built in ships as a RON script under the
//! characters directory, either `installed/<id>.ron` or
//! `available/<id>.ron`. Scripts carry the part list for the preview and,
//! optionally, the catalog metadata.
//!
//! ```ron
//! (
//!     id: "ufo",
//!     meta: Some((display_name: "UFO", glyph: "🛸", category: scifi)),
//!     parts: [(shape: Sphere, size: (2.0, 0.5, 2.0), offset: (0.0, 1.0, 0.0), color: (180, 180, 200))],
//! )
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use super::model::{Model, Part};
use super::PreviewError;
use crate::roster::{Category, CharacterDescriptor, CharacterId};
use crate::storage::{load_async, AsyncOp, LocalStorage, PendingLoad, StorageError};

pub const INSTALLED_DIR: &str = "installed";
pub const AVAILABLE_DIR: &str = "available";
pub const SCRIPT_EXTENSION: &str = "ron";

/// Catalog data a script may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptMeta {
    pub display_name: String,
    #[serde(default)]
    pub glyph: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterScript {
    pub id: CharacterId,
    #[serde(default)]
    pub meta: Option<ScriptMeta>,
    pub parts: Vec<Part>,
}

impl CharacterScript {
    pub fn parse(bytes: &[u8]) -> Result<Self, PreviewError> {
        ron::de::from_bytes(bytes).map_err(|e| PreviewError::ScriptParse(e.to_string()))
    }

    pub fn model(&self) -> Model {
        Model::new(self.parts.clone())
    }

    pub fn descriptor(&self) -> CharacterDescriptor {
        match &self.meta {
            Some(meta) => CharacterDescriptor {
                id: self.id.clone(),
                display_name: meta.display_name.clone(),
                glyph: meta.glyph.clone(),
                category: meta.category,
                description: meta.description.clone(),
                abilities: meta.abilities.clone(),
                installed: false,
            },
            None => CharacterDescriptor::placeholder(self.id.clone()),
        }
    }
}

/// Where scripts come from: the filesystem on native, the bundled manifest
/// in the browser
pub trait ScriptSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// File names in a directory
    fn list(&self, dir: &Path) -> Result<Vec<String>, StorageError>;

    /// Start a read the frame loop can poll
    fn fetch(&self, path: &Path) -> PendingLoad {
        PendingLoad {
            op: AsyncOp::ready(self.read(path)),
            path: path.to_path_buf(),
        }
    }
}

impl ScriptSource for LocalStorage {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        LocalStorage::read(self, path)
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        LocalStorage::list(self, dir)
    }

    fn fetch(&self, path: &Path) -> PendingLoad {
        load_async(self, path.to_path_buf())
    }
}

/// Scripts compiled into the binary by build.rs
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledScripts;

mod manifest {
    include!(concat!(env!("OUT_DIR"), "/character_manifest.rs"));
}

impl BundledScripts {
    fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
        manifest::BUNDLED_SCRIPTS.iter().copied()
    }
}

/// Manifest keys always use forward slashes
fn manifest_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl ScriptSource for BundledScripts {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let key = manifest_key(path);
        Self::entries()
            .find(|(name, _)| *name == key)
            .map(|(_, text)| text.as_bytes().to_vec())
            .ok_or(StorageError::NotFound(key))
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", manifest_key(dir));
        Ok(Self::entries()
            .filter_map(|(name, _)| name.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(|rest| rest.to_string())
            .collect())
    }
}

/// Outcome of one script request
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    Loaded(CharacterScript),
    /// No script in either directory
    Missing,
    Failed(PreviewError),
}

struct PendingScript {
    id: CharacterId,
    load: PendingLoad,
    /// Candidates still to try after this one
    remaining: Vec<PathBuf>,
}

/// Load-if-absent script fetching, one background read at a time per id
pub struct ScriptLoader<S: ScriptSource> {
    source: S,
    pending: Vec<PendingScript>,
    loaded: HashSet<CharacterId>,
}

fn script_path(dir: &str, id: &CharacterId) -> PathBuf {
    Path::new(dir).join(format!("{}.{}", id, SCRIPT_EXTENSION))
}

impl<S: ScriptSource> ScriptLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: Vec::new(),
            loaded: HashSet::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loaded(&self, id: &CharacterId) -> bool {
        self.loaded.contains(id)
    }

    pub fn is_pending(&self, id: &CharacterId) -> bool {
        self.pending.iter().any(|p| &p.id == id)
    }

    /// Start loading a script unless it is already loaded or in flight.
    /// Returns whether a new read was started.
    pub fn request(&mut self, id: &CharacterId) -> bool {
        if self.is_loaded(id) || self.is_pending(id) {
            return false;
        }
        let first = script_path(INSTALLED_DIR, id);
        debug!("Requesting script {}", first.display());
        self.pending.push(PendingScript {
            id: id.clone(),
            load: self.source.fetch(&first),
            remaining: vec![script_path(AVAILABLE_DIR, id)],
        });
        true
    }

    /// Collect every request that finished since the last poll
    pub fn poll(&mut self) -> Vec<(CharacterId, ScriptOutcome)> {
        let mut finished = Vec::new();
        // Fallback reads go back on the queue so ones that finish at once
        // resolve in this same poll
        let mut queue: VecDeque<PendingScript> = std::mem::take(&mut self.pending).into();
        while let Some(mut pending) = queue.pop_front() {
            let result = match pending.load.op.take() {
                Ok(result) => result,
                Err(op) => {
                    pending.load.op = op;
                    self.pending.push(pending);
                    continue;
                }
            };

            let outcome = match result {
                Ok(bytes) => match CharacterScript::parse(&bytes) {
                    Ok(script) => {
                        self.loaded.insert(pending.id.clone());
                        ScriptOutcome::Loaded(script)
                    }
                    Err(e) => {
                        warn!("{}: {}", pending.load.path.display(), e);
                        ScriptOutcome::Failed(e)
                    }
                },
                Err(StorageError::NotFound(_)) if !pending.remaining.is_empty() => {
                    let next = pending.remaining.remove(0);
                    pending.load = self.source.fetch(&next);
                    queue.push_back(pending);
                    continue;
                }
                Err(StorageError::NotFound(_)) => ScriptOutcome::Missing,
                Err(e) => {
                    warn!("{}: {}", pending.load.path.display(), e);
                    ScriptOutcome::Failed(PreviewError::ScriptLoad(e.to_string()))
                }
            };
            finished.push((pending.id, outcome));
        }
        finished
    }

    /// Forget in-flight requests; their reads finish and are dropped
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

/// Result of reading every script in both directories
#[derive(Debug, Default)]
pub struct ScanReport {
    pub descriptors: Vec<CharacterDescriptor>,
    pub skipped: Vec<(String, PreviewError)>,
}

/// Read catalog metadata from every script, installed first
pub fn scan_scripts(source: &dyn ScriptSource) -> ScanReport {
    let mut report = ScanReport::default();
    for dir in [INSTALLED_DIR, AVAILABLE_DIR] {
        let names = match source.list(Path::new(dir)) {
            Ok(names) => names,
            Err(StorageError::NotFound(_)) => continue,
            Err(e) => {
                report.skipped.push((dir.to_string(), PreviewError::ScriptLoad(e.to_string())));
                continue;
            }
        };
        for name in names {
            if Path::new(&name).extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
                continue;
            }
            let path = Path::new(dir).join(&name);
            let parsed = source
                .read(&path)
                .map_err(|e| PreviewError::ScriptLoad(e.to_string()))
                .and_then(|bytes| CharacterScript::parse(&bytes));
            match parsed {
                Ok(script) if report.descriptors.iter().any(|d| d.id == script.id) => {}
                Ok(script) => report.descriptors.push(script.descriptor()),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push((manifest_key(&path), e));
                }
            }
        }
    }
    report
}

/// In-memory script source
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryScripts {
    pub files: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryScripts {
    pub fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }
}

#[cfg(test)]
impl ScriptSource for MemoryScripts {
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let key = manifest_key(path);
        self.files
            .get(&key)
            .map(|text| text.as_bytes().to_vec())
            .ok_or(StorageError::NotFound(key))
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", manifest_key(dir));
        Ok(self
            .files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|k| k.to_string())
            .collect())
    }
}

#[cfg(test)]
pub const UFO_SCRIPT: &str = r#"(
    id: "ufo",
    meta: Some((display_name: "UFO", glyph: "🛸", category: scifi, abilities: ["Hover"])),
    parts: [
        (shape: Sphere, size: (2.0, 0.5, 2.0), offset: (0.0, 1.0, 0.0), color: (180, 180, 200)),
        (shape: Sphere, size: (0.8, 0.6, 0.8), offset: (0.0, 1.3, 0.0), color: (120, 200, 255)),
    ],
)"#;
