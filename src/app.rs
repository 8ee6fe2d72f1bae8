//! Application state and action handling
//!
//! Panels never touch the workspace directly: they return `Action`s, and
//! `App::apply` runs each one and turns the result into a status line.

use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::host::{CommitError, HostDocument};
use crate::preview::{register_builtin_generators, scan_scripts, GeneratorRegistry, PreviewSession, TriangleBackend};
use crate::roster::{builtin, CharacterDescriptor, CharacterId, RosterEditor, RosterError};
use crate::settings::Settings;
use crate::storage::{dialog, download, DownloadSink, StorageError};
use crate::workspace::Workspace;

#[cfg(not(target_arch = "wasm32"))]
pub type Scripts = crate::storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub type Scripts = crate::preview::BundledScripts;

/// Script source rooted at the characters directory
#[cfg(not(target_arch = "wasm32"))]
fn scripts_for(dir: &Path) -> Scripts {
    crate::storage::LocalStorage::with_base_dir(dir)
}

#[cfg(target_arch = "wasm32")]
fn scripts_for(_dir: &Path) -> Scripts {
    crate::preview::BundledScripts
}

pub type Preview = PreviewSession<TriangleBackend, Scripts>;

fn builtin_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    register_builtin_generators(&mut registry);
    registry
}

fn new_preview(characters_dir: &Path) -> Preview {
    PreviewSession::new(TriangleBackend::new(), scripts_for(characters_dir), builtin_registry())
}

const STATUS_SECS: f64 = 4.0;
const ERROR_SECS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pick a host document (native dialog, or the page's picker)
    Open,
    OpenPath(PathBuf),
    Commit,
    Install(CharacterId),
    Remove(CharacterId),
    MoveUp(usize),
    MoveDown(usize),
    Randomize,
    Reverse,
    /// Pick a new characters folder, then rescan it
    ChooseCharactersDir,
    Rescan,
    Select(CharacterId),
}

pub struct App {
    pub workspace: Workspace,
    pub preview: Preview,
    pub settings: Settings,
    settings_path: PathBuf,
    download: Box<dyn DownloadSink>,
    selected: Option<CharacterId>,
    /// (message, level, expiry time)
    status: Option<(String, StatusLevel, f64)>,
    pub roster_scroll: f32,
    pub catalog_scroll: f32,
}

impl App {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let download = download::platform_sink(settings.last_document_dir.clone());
        Self::with_download(settings, settings_path, download)
    }

    pub fn with_download(settings: Settings, settings_path: PathBuf, download: Box<dyn DownloadSink>) -> Self {
        Self {
            workspace: Workspace::new(settings.format.clone()),
            preview: new_preview(&settings.characters_dir),
            settings,
            settings_path,
            download,
            selected: None,
            status: None,
            roster_scroll: 0.0,
            catalog_scroll: 0.0,
        }
    }

    pub fn selected(&self) -> Option<&CharacterId> {
        self.selected.as_ref()
    }

    /// Descriptor for display, from the open roster's catalog or built-ins,
    /// with `installed` reflecting the open roster
    pub fn describe(&self, id: &CharacterId) -> Option<CharacterDescriptor> {
        let editor = self.workspace.editor();
        let mut descriptor = match editor {
            Some(editor) => editor.describe(id).cloned(),
            None => builtin::descriptor(id).cloned(),
        }?;
        descriptor.installed = editor.is_some_and(|editor| editor.roster().contains(id));
        Some(descriptor)
    }

    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel, now: f64) {
        let secs = if level == StatusLevel::Error { ERROR_SECS } else { STATUS_SECS };
        self.status = Some((message.into(), level, now + secs));
    }

    /// Current status message if not expired
    pub fn status(&self, now: f64) -> Option<(&str, StatusLevel)> {
        match &self.status {
            Some((msg, level, expiry)) if now < *expiry => Some((msg.as_str(), *level)),
            _ => None,
        }
    }

    fn storage_status(&mut self, context: &str, e: &StorageError, now: f64) {
        if e.is_quiet() {
            self.set_status(format!("{}: {}", context, e), StatusLevel::Info, now);
        } else {
            error!("{}: {}", context, e);
            self.set_status(format!("{} failed: {}", context, e), StatusLevel::Error, now);
        }
    }

    fn roster_status(&mut self, e: RosterError, now: f64) {
        warn!("{}", e);
        self.set_status(capitalize_first(&e.to_string()), StatusLevel::Warn, now);
    }

    /// Per-frame housekeeping: advance preview loads and browser imports
    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))]
    pub fn update(&mut self, now: f64) {
        let discovered = self.preview.poll();
        if !discovered.is_empty() {
            self.workspace.rescan(discovered);
        }

        #[cfg(target_arch = "wasm32")]
        match crate::storage::browser::take_import() {
            Some(Ok(file)) => self.open_document(HostDocument::from_text(file.name, file.text), now),
            Some(Err(e)) => self.storage_status("Import", &e, now),
            None => {}
        }
    }

    pub fn apply(&mut self, action: Action, now: f64) {
        match action {
            Action::Open => self.pick_and_open(now),
            Action::OpenPath(path) => self.open_path(&path, now),
            Action::Commit => self.commit(now),
            Action::Install(id) => self.edit(now, |editor| editor.install_id(&id)),
            Action::Remove(id) => self.edit(now, |editor| editor.remove(&id)),
            Action::MoveUp(index) => self.edit(now, |editor| editor.move_up(index)),
            Action::MoveDown(index) => self.edit(now, |editor| editor.move_down(index)),
            Action::Randomize => self.edit(now, |editor| {
                editor.randomize(&mut rand::thread_rng());
                Ok(())
            }),
            Action::Reverse => self.edit(now, |editor| {
                editor.reverse_order();
                Ok(())
            }),
            Action::ChooseCharactersDir => self.choose_characters_dir(now),
            Action::Rescan => self.rescan(now),
            Action::Select(id) => self.select(id),
        }
    }

    fn edit<F>(&mut self, now: f64, op: F)
    where
        F: FnOnce(&mut RosterEditor) -> Result<(), RosterError>,
    {
        let Some(editor) = self.workspace.editor_mut() else {
            self.set_status("Open a host document first", StatusLevel::Info, now);
            return;
        };
        if let Err(e) = op(editor) {
            self.roster_status(e, now);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pick_and_open(&mut self, now: f64) {
        match dialog::pick_host_document(self.settings.last_document_dir.as_deref()) {
            Ok(path) => self.open_path(&path, now),
            Err(e) => self.storage_status("Open", &e, now),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn pick_and_open(&mut self, now: f64) {
        crate::storage::browser::request_import();
        self.set_status("Choose a host document...", StatusLevel::Info, now);
    }

    pub fn open_path(&mut self, path: &Path, now: f64) {
        let document = match HostDocument::open_file(path) {
            Ok(document) => document,
            Err(e) => return self.storage_status("Open", &e, now),
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            self.settings.last_document_dir = Some(dir.to_path_buf());
            self.save_settings();
        }
        self.open_document(document, now);
    }

    pub fn open_document(&mut self, document: HostDocument, now: f64) {
        self.selected = None;
        self.roster_scroll = 0.0;
        self.catalog_scroll = 0.0;
        match self.workspace.open(document) {
            Ok(report) => {
                let level = if report.warnings.is_empty() { StatusLevel::Info } else { StatusLevel::Warn };
                self.set_status(report.summary(), level, now);
                self.rescan_quietly();
            }
            Err(e) => {
                warn!("Open failed: {}", e);
                self.set_status(capitalize_first(&e.to_string()), StatusLevel::Error, now);
            }
        }
    }

    fn commit(&mut self, now: f64) {
        match self.workspace.commit(self.download.as_mut()) {
            Ok(report) => {
                let level = if report.warnings.is_empty() { StatusLevel::Info } else { StatusLevel::Warn };
                self.set_status(report.summary(), level, now);
            }
            Err(CommitError::Storage(e)) => self.storage_status("Save", &e, now),
            Err(e @ CommitError::NoDocument) => self.set_status(capitalize_first(&e.to_string()), StatusLevel::Info, now),
        }
    }

    /// Read every script's metadata and merge it into the catalog
    fn rescan(&mut self, now: f64) {
        let report = scan_scripts(self.preview.source());
        let found = report.descriptors.len();
        let merged = self.workspace.rescan(report.descriptors);
        info!("Rescan: {} scripts, {} merged, {} skipped", found, merged, report.skipped.len());

        let mut msg = format!("Found {} character scripts", found);
        if !report.skipped.is_empty() {
            msg.push_str(&format!(", skipped {}", report.skipped.len()));
        }
        let level = if report.skipped.is_empty() { StatusLevel::Info } else { StatusLevel::Warn };
        self.set_status(msg, level, now);
    }

    /// Rescan without replacing the status line (used after open)
    fn rescan_quietly(&mut self) {
        let report = scan_scripts(self.preview.source());
        self.workspace.rescan(report.descriptors);
    }

    fn choose_characters_dir(&mut self, now: f64) {
        match dialog::pick_characters_dir(Some(&self.settings.characters_dir)) {
            Ok(dir) => self.set_characters_dir(dir, now),
            Err(e) => self.storage_status("Characters folder", &e, now),
        }
    }

    /// Point script loading at a new folder. The preview starts over with a
    /// fresh scene since its scripts came from the old one.
    pub fn set_characters_dir(&mut self, dir: PathBuf, now: f64) {
        info!("Characters folder: {}", dir.display());
        self.preview.switch_source(scripts_for(&dir), builtin_registry());
        self.settings.characters_dir = dir;
        self.save_settings();
        self.rescan(now);
        if let Some(id) = self.selected.clone() {
            self.preview.load_character(&id);
        }
    }

    /// Release the preview before the window closes
    pub fn shutdown(&mut self) {
        info!("Shutting down");
        self.preview.teardown();
    }

    fn select(&mut self, id: CharacterId) {
        if self.selected.as_ref() == Some(&id) {
            return;
        }
        self.preview.load_character(&id);
        self.selected = Some(id);
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!("Could not save settings: {}", e);
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::scripts::UFO_SCRIPT;
    use crate::preview::PreviewState;
    use crate::preview::SceneBackend;
    use crate::roster::tests::ids;
    use crate::storage::download::MemoryDownload;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const DOC: &str = "<script>\nconst characters = [/* ROSTER:BEGIN */ \"ghost\", \"robot\" /* ROSTER:END */];\n</script>";

    fn id(name: &str) -> CharacterId {
        CharacterId::parse(name).unwrap()
    }

    /// App with a characters folder holding one available script
    fn setup() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let chars = dir.path().join("characters");
        std::fs::create_dir_all(chars.join("available")).unwrap();
        std::fs::write(chars.join("available").join("ufo.ron"), UFO_SCRIPT).unwrap();

        let settings = Settings {
            characters_dir: chars,
            ..Settings::default()
        };
        let app = App::with_download(
            settings,
            dir.path().join("settings.ron"),
            Box::new(MemoryDownload::default()),
        );
        (dir, app)
    }

    fn roster(app: &App) -> Vec<CharacterId> {
        app.workspace.editor().unwrap().roster().ids().to_vec()
    }

    #[test]
    fn test_status_expires() {
        let (_dir, mut app) = setup();
        app.set_status("Saved", StatusLevel::Info, 10.0);
        assert_eq!(app.status(11.0), Some(("Saved", StatusLevel::Info)));
        assert_eq!(app.status(10.0 + STATUS_SECS), None);
    }

    #[test]
    fn test_edits_need_a_document() {
        let (_dir, mut app) = setup();
        app.apply(Action::Reverse, 0.0);
        assert_eq!(app.status(0.0).unwrap().0, "Open a host document first");
    }

    #[test]
    fn test_open_path_rescans_and_remembers_folder() {
        let (dir, mut app) = setup();
        let host = dir.path().join("game.html");
        std::fs::write(&host, DOC).unwrap();

        app.apply(Action::OpenPath(host), 0.0);
        assert_eq!(roster(&app), ids(&["ghost", "robot"]));
        assert!(app.workspace.editor().unwrap().catalog().get(&id("ufo")).is_some());
        assert_eq!(app.settings.last_document_dir.as_deref(), Some(dir.path()));
        assert!(dir.path().join("settings.ron").exists());
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let (dir, mut app) = setup();
        app.apply(Action::OpenPath(dir.path().join("nope.html")), 0.0);
        let (msg, level) = app.status(0.0).unwrap();
        assert!(msg.starts_with("Open failed"));
        assert_eq!(level, StatusLevel::Error);
        assert!(!app.workspace.is_open());
    }

    #[test]
    fn test_open_without_roster() {
        let (_dir, mut app) = setup();
        app.open_document(HostDocument::from_text("blank.html", "<html></html>"), 0.0);
        assert_eq!(app.status(0.0).unwrap().1, StatusLevel::Error);
        assert!(!app.workspace.is_open());
    }

    #[test]
    fn test_edit_actions_and_failures() {
        let (_dir, mut app) = setup();
        app.open_document(HostDocument::from_text("game.html", DOC), 0.0);

        app.apply(Action::Install(id("ufo")), 0.0);
        app.apply(Action::MoveUp(2), 0.0);
        assert_eq!(roster(&app), ids(&["ghost", "ufo", "robot"]));

        app.apply(Action::Install(id("ufo")), 1.0);
        assert_eq!(app.status(1.0), Some(("Ufo is already installed", StatusLevel::Warn)));

        app.apply(Action::Reverse, 2.0);
        assert_eq!(roster(&app), ids(&["robot", "ufo", "ghost"]));

        app.apply(Action::Remove(id("ufo")), 2.0);
        app.apply(Action::Remove(id("robot")), 2.0);
        app.apply(Action::Remove(id("ghost")), 3.0);
        assert_eq!(roster(&app), ids(&["ghost"]));
        assert_eq!(app.status(3.0).unwrap().1, StatusLevel::Warn);
    }

    #[test]
    fn test_describe_tracks_roster() {
        let (_dir, mut app) = setup();
        assert!(!app.describe(&id("ghost")).unwrap().installed);
        assert!(app.describe(&id("ufo")).is_none());

        app.open_document(HostDocument::from_text("game.html", DOC), 0.0);
        assert!(app.describe(&id("ghost")).unwrap().installed);
        assert!(!app.describe(&id("dragon")).unwrap().installed);
        assert_eq!(app.describe(&id("ufo")).unwrap().display_name, "UFO");
    }

    #[test]
    fn test_randomize_keeps_members() {
        let (_dir, mut app) = setup();
        app.open_document(HostDocument::from_text("game.html", DOC), 0.0);
        app.apply(Action::Install(id("dragon")), 0.0);
        app.apply(Action::Randomize, 0.0);
        let mut after = roster(&app);
        after.sort();
        assert_eq!(after, ids(&["dragon", "ghost", "robot"]));
    }

    #[test]
    fn test_commit_without_handle_downloads() {
        let (_dir, mut app) = setup();
        app.open_document(HostDocument::from_text("game.html", DOC), 0.0);
        app.apply(Action::Install(id("dragon")), 0.0);
        app.apply(Action::Commit, 1.0);

        assert!(app.status(1.0).unwrap().0.contains("game_updated.html"));
        assert!(app.workspace.document().unwrap().text().contains(r#""ghost", "robot", "dragon""#));
    }

    #[test]
    fn test_commit_writes_in_place() {
        let (dir, mut app) = setup();
        let host = dir.path().join("game.html");
        std::fs::write(&host, DOC).unwrap();
        app.apply(Action::OpenPath(host.clone()), 0.0);
        app.apply(Action::Remove(id("ghost")), 0.0);
        app.apply(Action::Commit, 0.0);

        let written = std::fs::read_to_string(&host).unwrap();
        assert!(written.contains(r#"/* ROSTER:BEGIN */ "robot" /* ROSTER:END */"#));
    }

    #[test]
    fn test_commit_with_nothing_open() {
        let (_dir, mut app) = setup();
        app.apply(Action::Commit, 0.0);
        assert_eq!(app.status(0.0).unwrap().1, StatusLevel::Info);
    }

    #[test]
    fn test_select_loads_preview() {
        let (_dir, mut app) = setup();
        app.apply(Action::Select(id("ghost")), 0.0);
        assert_eq!(app.selected(), Some(&id("ghost")));
        assert_eq!(app.preview.state(), &PreviewState::Displaying { id: id("ghost") });

        app.apply(Action::Select(id("ufo")), 0.0);
        assert_eq!(app.preview.state(), &PreviewState::Loading { id: id("ufo") });
        let deadline = Instant::now() + Duration::from_secs(5);
        while matches!(app.preview.state(), PreviewState::Loading { .. }) {
            assert!(Instant::now() < deadline, "preview load timed out");
            app.update(0.0);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(app.preview.state(), &PreviewState::Displaying { id: id("ufo") });
        assert_eq!(app.preview.backend().model_nodes().len(), 1);
    }

    #[test]
    fn test_set_characters_dir_switches_preview_source() {
        let (dir, mut app) = setup();
        app.apply(Action::Select(id("robot")), 0.0);

        let other = dir.path().join("other");
        std::fs::create_dir_all(other.join("installed")).unwrap();
        std::fs::write(
            other.join("installed").join("tv.ron"),
            r#"(id: "tv", meta: Some((display_name: "TV")), parts: [])"#,
        )
        .unwrap();
        app.open_document(HostDocument::from_text("game.html", DOC), 0.0);
        app.set_characters_dir(other.clone(), 0.0);

        assert_eq!(app.settings.characters_dir, other);
        let catalog = app.workspace.editor().unwrap().catalog();
        assert_eq!(catalog.get(&id("tv")).unwrap().display_name, "TV");
        // Selection is cleared by open, so nothing reloads
        assert_eq!(app.preview.state(), &PreviewState::Empty);
        assert_eq!(app.status(0.0).unwrap().0, "Found 1 character scripts");

        // The new folder's script is what the preview loads
        app.apply(Action::Select(id("tv")), 0.0);
        let deadline = Instant::now() + Duration::from_secs(5);
        while matches!(app.preview.state(), PreviewState::Loading { .. }) {
            assert!(Instant::now() < deadline, "preview load timed out");
            app.update(0.0);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(app.preview.state(), &PreviewState::Displaying { id: id("tv") });
    }

    #[test]
    fn test_shutdown_disposes_preview() {
        let (_dir, mut app) = setup();
        app.apply(Action::Select(id("robot")), 0.0);
        assert_eq!(app.preview.state(), &PreviewState::Displaying { id: id("robot") });

        app.shutdown();
        assert_eq!(app.preview.state(), &PreviewState::Disposed);
        assert!(!app.preview.is_looping());
    }
}
