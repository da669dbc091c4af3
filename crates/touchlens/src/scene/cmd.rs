use crate::coords::Rect;
use crate::host::ScaleMode;
use crate::texture::MarkerTexture;

/// Textured rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCmd {
    pub rect: Rect,
    pub texture: MarkerTexture,
    pub scale_mode: ScaleMode,
}

/// Renderer-agnostic draw command stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Texture(TextureCmd),
}
