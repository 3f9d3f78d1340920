//! The play area pieces are kept inside.

use serde::{Deserialize, Serialize};

use crate::Aabb;

/// The screen-space play area.
///
/// Pieces may move anywhere in
/// `[padding, width - padding] × [top_margin, height - padding]`;
/// the strip above `top_margin` is reserved for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen width in pixels.
    pub width: f32,
    /// Screen height in pixels.
    pub height: f32,
    /// Reserved strip at the top of the screen.
    pub top_margin: f32,
    /// Padding kept free on the left, right and bottom edges.
    pub padding: f32,
}

impl Viewport {
    /// Default screen width.
    pub const DEFAULT_WIDTH: f32 = 1280.0;
    /// Default screen height.
    pub const DEFAULT_HEIGHT: f32 = 720.0;
    /// Default HUD strip height.
    pub const DEFAULT_TOP_MARGIN: f32 = 70.0;
    /// Default edge padding.
    pub const DEFAULT_PADDING: f32 = 8.0;

    /// Creates a viewport of the given size with the default margins.
    #[must_use]
    pub const fn with_size(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            top_margin: Self::DEFAULT_TOP_MARGIN,
            padding: Self::DEFAULT_PADDING,
        }
    }

    /// The region piece bounding boxes must stay inside.
    #[must_use]
    pub fn play_area(&self) -> Aabb {
        Aabb::new(
            crate::Vec2::new(self.padding, self.top_margin),
            crate::Vec2::new(self.width - self.padding, self.height - self.padding),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_size(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}
