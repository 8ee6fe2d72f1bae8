//! Editor layout
//!
//! ```text
//! +--------------------------------------------------------------+
//! | Open  Save | Randomize  Reverse | Folder  Rescan | game.html |
//! +----------------+----------------+----------------------------+
//! | Active roster  | Available      | Preview                    |
//! |  ghost  ^ v x  |  ufo   Install |        (orbit view)        |
//! |  robot  ^ v x  |  tv    Install |                            |
//! +----------------+----------------+----------------------------+
//! | status                                                       |
//! +--------------------------------------------------------------+
//! ```

use macroquad::prelude::*;

use crate::app::{Action, App, StatusLevel};
use crate::preview::{OrbitInput, PreviewState};
use crate::roster::CharacterDescriptor;
use crate::ui::{
    draw_centered_text, draw_header, list_row, text_button, Rect, Toolbar, UiContext, BG_COLOR, ERROR_COLOR,
    FONT_SIZE_CONTENT, FONT_SIZE_SMALL, HEADER_COLOR, ROW_HEIGHT, ROW_ODD, TEXT_COLOR, TEXT_DIM, WARN_COLOR,
};

const TOOLBAR_HEIGHT: f32 = 34.0;
const STATUS_HEIGHT: f32 = 24.0;
const HEADER_HEIGHT: f32 = 26.0;
const DETAILS_HEIGHT: f32 = 84.0;
const SCROLL_SPEED: f32 = ROW_HEIGHT * 3.0;

/// Draw the whole editor for one frame and collect what the user asked for
pub fn draw_app(ctx: &mut UiContext, app: &mut App, dt: f32, now: f64) -> Vec<Action> {
    let mut actions = Vec::new();
    let screen = Rect::screen(screen_width(), screen_height());
    clear_background(BG_COLOR);

    let toolbar = screen.slice_top(TOOLBAR_HEIGHT);
    let body = screen.remaining_after_top(TOOLBAR_HEIGHT);
    let status = body.slice_bottom(STATUS_HEIGHT);
    let body = body.remaining_after_bottom(STATUS_HEIGHT);

    draw_toolbar(ctx, app, toolbar, &mut actions);

    let (lists, preview) = body.split_h(0.55);
    let (roster, catalog) = lists.split_h(0.5);
    draw_roster_panel(ctx, app, roster.pad(4.0), &mut actions);
    draw_catalog_panel(ctx, app, catalog.pad(4.0), &mut actions);
    draw_preview_panel(ctx, app, preview.pad(4.0), dt);

    draw_status(app, status, now);
    actions
}

fn draw_toolbar(ctx: &mut UiContext, app: &App, rect: Rect, actions: &mut Vec<Action>) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    let open = app.workspace.is_open();
    let mut toolbar = Toolbar::new(rect);

    if toolbar.button(ctx, "Open", true) {
        actions.push(Action::Open);
    }
    if toolbar.button(ctx, "Save", open) {
        actions.push(Action::Commit);
    }
    toolbar.separator();
    if toolbar.button(ctx, "Randomize", open) {
        actions.push(Action::Randomize);
    }
    if toolbar.button(ctx, "Reverse", open) {
        actions.push(Action::Reverse);
    }
    toolbar.separator();
    #[cfg(not(target_arch = "wasm32"))]
    if toolbar.button(ctx, "Characters...", true) {
        actions.push(Action::ChooseCharactersDir);
    }
    if toolbar.button(ctx, "Rescan", true) {
        actions.push(Action::Rescan);
    }
    toolbar.separator();

    match (app.workspace.document(), app.workspace.editor()) {
        (Some(document), Some(editor)) => {
            let mode = if document.can_write_in_place() { "" } else { " (download on save)" };
            toolbar.label(&format!("{}{}  rev {}", document.name(), mode, editor.revision()));
        }
        _ => toolbar.label("No document open"),
    }
}

/// Scroll offset clamped so the last row stays reachable
fn scroll_list(ctx: &UiContext, list: Rect, scroll: f32, rows: usize) -> f32 {
    let max = (rows as f32 * ROW_HEIGHT - list.h).max(0.0);
    let delta = match ctx.mouse.scroll {
        s if s > 0.0 && ctx.mouse.inside(&list) => -SCROLL_SPEED,
        s if s < 0.0 && ctx.mouse.inside(&list) => SCROLL_SPEED,
        _ => 0.0,
    };
    (scroll + delta).clamp(0.0, max)
}

fn draw_roster_panel(ctx: &mut UiContext, app: &mut App, rect: Rect, actions: &mut Vec<Action>) {
    let Some(editor) = app.workspace.editor() else {
        draw_header(rect.slice_top(HEADER_HEIGHT), "Active roster");
        draw_centered_text("Open a host document", &rect, FONT_SIZE_CONTENT, TEXT_DIM);
        return;
    };
    let entries: Vec<CharacterDescriptor> = editor
        .roster()
        .iter()
        .map(|id| editor.describe(id).cloned().unwrap_or_else(|| CharacterDescriptor::placeholder(id.clone())))
        .collect();

    draw_header(rect.slice_top(HEADER_HEIGHT), &format!("Active roster ({})", entries.len()));
    let list = rect.remaining_after_top(HEADER_HEIGHT);
    app.roster_scroll = scroll_list(ctx, list, app.roster_scroll, entries.len());

    let last = entries.len().saturating_sub(1);
    for (index, descriptor) in entries.iter().enumerate() {
        let row = list.row(index, ROW_HEIGHT, app.roster_scroll);
        if !list.encloses(&row) {
            continue;
        }
        // Buttons claim their clicks before the row underneath
        let button_zone = Rect::new(row.right() - 84.0, row.y, 84.0, row.h);
        let buttons = Rect::new(button_zone.x, row.y + 2.0, 80.0, row.h - 4.0).columns(3);
        let selected = app.selected() == Some(&descriptor.id);
        let label = format!("{}. {}", index + 1, descriptor.display_name);
        let row_clicked = list_row(ctx, row, index, &label, selected);

        if text_button(ctx, buttons[0].pad(1.0), "^", index > 0) {
            actions.push(Action::MoveUp(index));
        } else if text_button(ctx, buttons[1].pad(1.0), "v", index < last) {
            actions.push(Action::MoveDown(index));
        } else if text_button(ctx, buttons[2].pad(1.0), "x", entries.len() > 1) {
            actions.push(Action::Remove(descriptor.id.clone()));
        } else if row_clicked && !ctx.mouse.inside(&button_zone) {
            actions.push(Action::Select(descriptor.id.clone()));
        }
    }
}

fn draw_catalog_panel(ctx: &mut UiContext, app: &mut App, rect: Rect, actions: &mut Vec<Action>) {
    let Some(editor) = app.workspace.editor() else {
        draw_header(rect.slice_top(HEADER_HEIGHT), "Available");
        return;
    };
    let entries: Vec<CharacterDescriptor> = editor.available().into_iter().cloned().collect();

    draw_header(rect.slice_top(HEADER_HEIGHT), &format!("Available ({})", entries.len()));
    let list = rect.remaining_after_top(HEADER_HEIGHT);
    if entries.is_empty() {
        draw_centered_text("Every known character is installed", &list, FONT_SIZE_SMALL, TEXT_DIM);
        return;
    }
    app.catalog_scroll = scroll_list(ctx, list, app.catalog_scroll, entries.len());

    for (index, descriptor) in entries.iter().enumerate() {
        let row = list.row(index, ROW_HEIGHT, app.catalog_scroll);
        if !list.encloses(&row) {
            continue;
        }
        let install = Rect::new(row.right() - 64.0, row.y + 2.0, 60.0, row.h - 4.0);
        let selected = app.selected() == Some(&descriptor.id);
        let row_clicked = list_row(ctx, row, index, &descriptor.display_name, selected);

        if text_button(ctx, install, "Install", true) {
            actions.push(Action::Install(descriptor.id.clone()));
        } else if row_clicked && !ctx.mouse.inside(&install) {
            actions.push(Action::Select(descriptor.id.clone()));
        }
    }
}

fn draw_preview_panel(ctx: &mut UiContext, app: &mut App, rect: Rect, dt: f32) {
    let title = match app.selected().and_then(|id| app.describe(id)) {
        Some(descriptor) => format!("{} ({})", descriptor.display_name, descriptor.category.label()),
        None => "Preview".to_string(),
    };
    draw_header(rect.slice_top(HEADER_HEIGHT), &title);

    let body = rect.remaining_after_top(HEADER_HEIGHT);
    let viewport = body.remaining_after_bottom(DETAILS_HEIGHT);
    let details = body.slice_bottom(DETAILS_HEIGHT);

    let input = OrbitInput {
        x: ctx.mouse.x,
        y: ctx.mouse.y,
        left_down: ctx.mouse.left_down,
        scroll: ctx.mouse.scroll,
    };
    if app.preview.is_looping() {
        app.preview.frame(dt, &input, viewport);
    }
    match app.preview.state() {
        PreviewState::Displaying { .. } => {}
        PreviewState::Loading { id } => {
            draw_rectangle(viewport.x, viewport.y, viewport.w, viewport.h, ROW_ODD);
            draw_centered_text(&format!("Loading {}...", id), &viewport, FONT_SIZE_CONTENT, TEXT_DIM);
        }
        PreviewState::Unavailable { reason, .. } => {
            draw_rectangle(viewport.x, viewport.y, viewport.w, viewport.h, ROW_ODD);
            draw_centered_text(&format!("Preview unavailable: {}", reason), &viewport, FONT_SIZE_CONTENT, ERROR_COLOR);
        }
        PreviewState::Empty | PreviewState::Disposed => {
            draw_rectangle(viewport.x, viewport.y, viewport.w, viewport.h, ROW_ODD);
            draw_centered_text("Select a character", &viewport, FONT_SIZE_CONTENT, TEXT_DIM);
        }
    }

    if let Some(descriptor) = app.selected().and_then(|id| app.describe(id)) {
        let mut y = details.y + 18.0;
        if !descriptor.description.is_empty() {
            draw_text(&descriptor.description, details.x + 8.0, y, FONT_SIZE_CONTENT, TEXT_COLOR);
            y += 20.0;
        }
        if !descriptor.abilities.is_empty() {
            let abilities = format!("Abilities: {}", descriptor.abilities.join(", "));
            draw_text(&abilities, details.x + 8.0, y, FONT_SIZE_SMALL, TEXT_DIM);
            y += 18.0;
        }
        let state = if descriptor.installed { "In roster" } else { "Not installed" };
        draw_text(state, details.x + 8.0, y, FONT_SIZE_SMALL, TEXT_DIM);
    }
}

fn draw_status(app: &App, rect: Rect, now: f64) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    if let Some((msg, level)) = app.status(now) {
        let color = match level {
            StatusLevel::Info => TEXT_COLOR,
            StatusLevel::Warn => WARN_COLOR,
            StatusLevel::Error => ERROR_COLOR,
        };
        let baseline = (rect.y + rect.h * 0.5 + FONT_SIZE_CONTENT * 0.3).round();
        draw_text(msg, rect.x + 8.0, baseline, FONT_SIZE_CONTENT, color);
    }
}
