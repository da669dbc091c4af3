//! Marker texture handles.

use std::path::Path;

use anyhow::{Context, Result};

/// Host-assigned texture handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u64);

/// Marker image as seen by the overlay: a handle plus its pixel size.
///
/// Pixel data stays with the host; sizing only needs the dimensions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MarkerTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl MarkerTexture {
    #[inline]
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Reads the dimensions of an image file without decoding its pixels.
    pub fn from_file(id: TextureId, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("failed to read marker texture {}", path.display()))?;

        log::debug!("marker texture {} is {width}x{height}", path.display());
        Ok(Self::new(id, width, height))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
