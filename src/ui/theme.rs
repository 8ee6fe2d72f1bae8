//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Dark background color
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Header/toolbar background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Accent color (cyan), used for the selected row and primary actions
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Non-fatal notes (fallback extraction, skipped regions)
pub const WARN_COLOR: Color = Color::new(0.95, 0.75, 0.3, 1.0);

/// Blocking errors (no roster found, preview unavailable)
pub const ERROR_COLOR: Color = Color::new(0.95, 0.4, 0.4, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 16.0;
pub const FONT_SIZE_CONTENT: f32 = 14.0;
pub const FONT_SIZE_SMALL: f32 = 12.0;

// =============================================================================
// Lists
// =============================================================================

pub const ROW_HEIGHT: f32 = 22.0;

/// Even row background
pub const ROW_EVEN: Color = Color::new(0.13, 0.13, 0.15, 1.0);

/// Odd row background
pub const ROW_ODD: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Hovered row
pub const ROW_HOVER: Color = Color::new(0.17, 0.17, 0.2, 1.0);

/// Highlighted/selected row
pub const ROW_HIGHLIGHT: Color = Color::new(0.2, 0.25, 0.3, 1.0);

// =============================================================================
// Buttons
// =============================================================================

pub const BUTTON_BG: Color = Color::new(0.196, 0.196, 0.216, 1.0); // ~50, 50, 55
pub const BUTTON_HOVER: Color = Color::new(0.235, 0.235, 0.275, 1.0); // ~60, 60, 70
pub const BUTTON_PRESSED: Color = Color::new(0.235, 0.314, 0.392, 1.0); // ~60, 80, 100
