//! Roster Forge: edit the character roster baked into a game's host page
//!
//! The host document (an HTML page) lists its playable characters in a few
//! marker-delimited regions. Roster Forge reads the active roster back out,
//! lets you install, remove and reorder characters with a live 3D preview,
//! and regenerates every region on save:
//! - Prioritized extraction, with fallbacks for documents without markers
//! - Deterministic regeneration of each region from the roster
//! - Write in place, or download `<name>_updated.html` when that isn't possible

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod host;
mod panels;
mod preview;
mod roster;
mod settings;
mod storage;
mod ui;
mod workspace;

use macroquad::prelude::*;

use app::{Action, App};
use settings::{CliArgs, Settings};
use ui::{MouseState, UiContext};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Roster Forge v{}", VERSION),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Command line on native; the browser build has none
#[cfg(not(target_arch = "wasm32"))]
fn cli_args() -> CliArgs {
    use clap::Parser;
    CliArgs::parse()
}

#[cfg(target_arch = "wasm32")]
fn cli_args() -> CliArgs {
    CliArgs::default()
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli_args();
    let settings_path = args.settings.clone().unwrap_or_else(settings::default_settings_path);
    let mut settings = Settings::load_or_default(&settings_path);
    settings.apply_args(&args);
    log::info!("Roster Forge v{} (characters: {})", VERSION, settings.characters_dir.display());

    let mut app = App::new(settings, settings_path);
    if let Some(host) = args.host {
        app.apply(Action::OpenPath(host), get_time());
    } else {
        app.apply(Action::Rescan, get_time());
    }

    let mut ui_ctx = UiContext::new();
    prevent_quit();

    loop {
        if is_quit_requested() {
            app.shutdown();
            break;
        }

        let now = get_time();
        let dt = get_frame_time();

        ui_ctx.begin_frame(MouseState::capture());
        app.update(now);

        let actions = panels::draw_app(&mut ui_ctx, &mut app, dt, now);
        for action in actions {
            app.apply(action, now);
        }

        next_frame().await;
    }
}
