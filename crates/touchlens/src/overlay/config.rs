use crate::host::ScaleMode;
use crate::input::MissPolicy;
use crate::texture::MarkerTexture;

use super::OverlayError;

/// User-facing overlay settings.
///
/// Changing any sizing-related field through [`TouchDebugger`] recomputes
/// the marker geometry.
///
/// [`TouchDebugger`]: super::TouchDebugger
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Marker image. The overlay refuses to start without one.
    pub texture: Option<MarkerTexture>,
    /// Size markers from display density instead of the fixed 32 px.
    pub use_density_scaling: bool,
    /// Physical marker size in centimeters (density mode only).
    pub marker_size_cm: f32,
    /// Handling of unknown ids in move/end/cancel batches.
    pub miss_policy: MissPolicy,
    /// Stretch policy passed with every draw call.
    pub scale_mode: ScaleMode,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            texture: None,
            use_density_scaling: true,
            marker_size_cm: 1.0,
            miss_policy: MissPolicy::AbortBatch,
            scale_mode: ScaleMode::ScaleToFit,
        }
    }
}

impl OverlayConfig {
    pub fn with_texture(texture: MarkerTexture) -> Self {
        Self { texture: Some(texture), ..Self::default() }
    }

    /// Checks the values setters would reject.
    pub fn validate(&self) -> Result<(), OverlayError> {
        check_marker_size(self.marker_size_cm)?;
        check_texture(self.texture.as_ref())
    }
}

pub(crate) fn check_marker_size(cm: f32) -> Result<(), OverlayError> {
    if cm.is_finite() && cm > 0.0 {
        Ok(())
    } else {
        Err(OverlayError::InvalidMarkerSize(cm))
    }
}

pub(crate) fn check_texture(texture: Option<&MarkerTexture>) -> Result<(), OverlayError> {
    match texture {
        Some(tex) if tex.is_empty() => Err(OverlayError::InvalidTextureSize { width: tex.width, height: tex.height }),
        _ => Ok(()),
    }
}
