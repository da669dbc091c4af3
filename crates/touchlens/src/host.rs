//! Host-side collaborators the overlay is injected with.
//!
//! The overlay never looks these up globally: whoever owns the frame loop
//! passes them in.

use crate::coords::Rect;
use crate::texture::MarkerTexture;

/// Display queries answered by the host on demand.
pub trait DisplayMetrics {
    /// Current physical density in dots per inch.
    fn density(&self) -> f32;

    /// Current screen height in logical pixels, used for the vertical flip.
    fn screen_height(&self) -> f32;
}

/// How a texture fills its destination rectangle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ScaleMode {
    /// Scale uniformly until the texture fits inside the rectangle.
    #[default]
    ScaleToFit,
    /// Stretch to the rectangle, ignoring aspect ratio.
    StretchToFill,
}

/// Immediate-mode "draw textured rectangle" primitive.
pub trait DrawSink {
    fn draw_texture(&mut self, rect: Rect, texture: &MarkerTexture, mode: ScaleMode);
}

/// Display with fixed, caller-controlled metrics.
///
/// Used by trace replay and tests; fields can be changed between frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StaticDisplay {
    pub density: f32,
    pub screen_height: f32,
}

impl StaticDisplay {
    pub const fn new(density: f32, screen_height: f32) -> Self {
        Self { density, screen_height }
    }
}

impl DisplayMetrics for StaticDisplay {
    fn density(&self) -> f32 {
        self.density
    }

    fn screen_height(&self) -> f32 {
        self.screen_height
    }
}
