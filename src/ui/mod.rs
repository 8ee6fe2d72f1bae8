//! Immediate-mode UI for the roster editor
//!
//! Panels are rebuilt every frame from workspace state:
//! - Simple rectangle-based layout
//! - Widgets return what happened (clicked, selected) instead of holding state
//! - Macroquad for drawing

mod input;
mod rect;
mod theme;
mod widgets;

pub use input::*;
pub use rect::*;
pub use theme::*;
pub use widgets::*;
