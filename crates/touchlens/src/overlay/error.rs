use std::fmt;

/// Configuration problems reported by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// The overlay was started without a marker texture.
    MissingTexture,
    /// Marker size must be a positive, finite number of centimeters.
    InvalidMarkerSize(f32),
    /// Marker textures must have non-zero dimensions.
    InvalidTextureSize { width: u32, height: u32 },
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::MissingTexture => f.write_str("touch debugger has no marker texture assigned"),
            OverlayError::InvalidMarkerSize(cm) => write!(f, "invalid marker size {cm} cm"),
            OverlayError::InvalidTextureSize { width, height } => {
                write!(f, "invalid marker texture size {width}x{height}")
            }
        }
    }
}

impl std::error::Error for OverlayError {}
