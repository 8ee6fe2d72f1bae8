//! Basic UI widgets

use macroquad::prelude::*;

use super::theme::*;
use super::{Rect, UiContext};

/// Simple toolbar layout helper
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.x + 4.0,
            spacing: 4.0,
        }
    }

    /// Add a separator
    pub fn separator(&mut self) {
        self.cursor_x += self.spacing * 2.0;
        draw_line(
            self.cursor_x,
            self.rect.y + 4.0,
            self.cursor_x,
            self.rect.bottom() - 4.0,
            1.0,
            Color::from_rgba(80, 80, 80, 255),
        );
        self.cursor_x += self.spacing * 2.0;
    }

    /// Add a label
    pub fn label(&mut self, text: &str) {
        let text_dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
        // Round to integer pixels for crisp rendering
        let text_y = (self.rect.y + (self.rect.h + text_dims.height) * 0.5).round();
        draw_text(text, self.cursor_x.round(), text_y, FONT_SIZE_CONTENT, TEXT_COLOR);
        self.cursor_x += text_dims.width + self.spacing;
    }

    /// Add a text button sized to its label
    pub fn button(&mut self, ctx: &mut UiContext, label: &str, enabled: bool) -> bool {
        let text_w = measure_text(label, None, FONT_SIZE_CONTENT as u16, 1.0).width;
        let btn_rect = Rect::new(
            self.cursor_x.round(),
            (self.rect.y + 3.0).round(),
            (text_w + 16.0).round(),
            (self.rect.h - 6.0).round(),
        );
        self.cursor_x += btn_rect.w + self.spacing;
        text_button(ctx, btn_rect, label, enabled)
    }
}

/// Draw a text button, returns true if clicked. Disabled buttons draw dimmed
/// and never report clicks.
pub fn text_button(ctx: &mut UiContext, rect: Rect, label: &str, enabled: bool) -> bool {
    let hovered = enabled && ctx.mouse.inside(&rect);
    let pressed = enabled && ctx.mouse.clicking(&rect);
    let clicked = enabled && ctx.mouse.clicked(&rect);

    let bg = if pressed {
        BUTTON_PRESSED
    } else if hovered {
        BUTTON_HOVER
    } else {
        BUTTON_BG
    };
    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 3.0, bg);

    let color = if enabled { TEXT_COLOR } else { TEXT_DIM };
    draw_centered_text(label, &rect, FONT_SIZE_CONTENT, color);

    clicked
}

/// One row of a list; returns true if clicked
pub fn list_row(ctx: &mut UiContext, rect: Rect, index: usize, text: &str, selected: bool) -> bool {
    let hovered = ctx.mouse.inside(&rect);

    let bg = if selected {
        ROW_HIGHLIGHT
    } else if hovered {
        ROW_HOVER
    } else if index % 2 == 0 {
        ROW_EVEN
    } else {
        ROW_ODD
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    if selected {
        draw_rectangle(rect.x, rect.y, 3.0, rect.h, ACCENT_COLOR);
    }

    let baseline = (rect.y + rect.h * 0.5 + FONT_SIZE_CONTENT * 0.3).round();
    draw_text(text, (rect.x + 8.0).round(), baseline, FONT_SIZE_CONTENT, TEXT_COLOR);

    ctx.mouse.clicked(&rect)
}

/// Panel header strip with a title
pub fn draw_header(rect: Rect, title: &str) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    let baseline = (rect.y + rect.h * 0.5 + FONT_SIZE_HEADER * 0.3).round();
    draw_text(title, (rect.x + 8.0).round(), baseline, FONT_SIZE_HEADER, TEXT_COLOR);
}

/// Text centered inside a rect
pub fn draw_centered_text(text: &str, rect: &Rect, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    let x = (rect.center_x() - dims.width * 0.5).round();
    let y = (rect.center_y() + dims.offset_y * 0.5).round();
    draw_text(text, x, y, font_size, color);
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    // Main body
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    // Corners (circles)
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
