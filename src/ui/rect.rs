//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Split horizontally at ratio (0.0 - 1.0), returns (left, right)
    pub fn split_h(&self, ratio: f32) -> (Self, Self) {
        let split_x = self.w * ratio.clamp(0.0, 1.0);
        (
            Self::new(self.x, self.y, split_x, self.h),
            Self::new(self.x + split_x, self.y, self.w - split_x, self.h),
        )
    }

    /// Split into `n` equal columns
    pub fn columns(&self, n: usize) -> Vec<Self> {
        let n = n.max(1);
        let w = self.w / n as f32;
        (0..n)
            .map(|i| Self::new(self.x + w * i as f32, self.y, w, self.h))
            .collect()
    }

    /// Horizontal slice from the top (toolbars, headers)
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.min(self.h))
    }

    /// Remaining area after slicing top
    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    /// Horizontal slice from the bottom (status bar)
    pub fn slice_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.bottom() - h, self.w, h)
    }

    /// Remaining area after slicing bottom
    pub fn remaining_after_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y, self.w, self.h - h)
    }

    /// The `index`th fixed-height row, offset by a scroll amount. May lie
    /// outside `self`; check with `encloses` before drawing.
    pub fn row(&self, index: usize, height: f32, scroll: f32) -> Self {
        Self::new(self.x, self.y + index as f32 * height - scroll, self.w, height)
    }

    /// `other` lies fully inside (no clipping in immediate mode)
    pub fn encloses(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }
}
