use crate::coords::Vec2;

use super::OverlayConfig;

/// Centimeters per inch; densities are reported in dots per inch.
pub const INCH_TO_CM: f32 = 2.54;

/// Marker edge length when density scaling is off.
pub const FIXED_MARKER_PX: u32 = 32;

/// Scale factor reported when density scaling is off.
pub const FIXED_SCALE: f32 = 0.25;

/// Marker geometry derived from configuration and display density.
///
/// Always recomputed as a whole. Half extents are floored, so
/// `half_width == width / 2` in integer arithmetic.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SizingState {
    pub width: u32,
    pub height: u32,
    pub half_width: u32,
    pub half_height: u32,
    pub scale: f32,
    /// Density the state was computed for; `None` in fixed mode.
    pub density: Option<f32>,
}

impl SizingState {
    /// Fixed 32x32 marker, independent of texture and display.
    pub fn fixed() -> Self {
        Self::from_size(FIXED_MARKER_PX, FIXED_MARKER_PX, FIXED_SCALE, None)
    }

    /// Marker sized so it spans `marker_size_cm` on a display of `density` dpi.
    ///
    /// The texture is treated as if its full width covered `marker_size_cm`.
    pub fn density_scaled(texture_width: u32, texture_height: u32, marker_size_cm: f32, density: f32) -> Self {
        let texture_density = texture_width as f32 * INCH_TO_CM / marker_size_cm;
        let scale = density / texture_density;

        // `as` saturates and truncates toward zero, i.e. floors for non-negative values.
        let width = (texture_width as f32 * scale) as u32;
        let height = (texture_height as f32 * scale) as u32;

        Self::from_size(width, height, scale, Some(density))
    }

    /// Geometry for `config` on a display of `density` dpi.
    ///
    /// Density mode without a texture yields an empty marker.
    pub fn compute(config: &OverlayConfig, density: f32) -> Self {
        if !config.use_density_scaling {
            return Self::fixed();
        }

        match config.texture {
            Some(tex) => Self::density_scaled(tex.width, tex.height, config.marker_size_cm, density),
            None => Self { density: Some(density), ..Self::default() },
        }
    }

    /// Whether a display now reporting `density` calls for a recompute.
    ///
    /// Fixed-mode states never go stale.
    pub fn is_stale(&self, density: f32) -> bool {
        match self.density {
            Some(last) => !approx_eq(last, density),
            None => false,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.half_width as f32, self.half_height as f32)
    }

    fn from_size(width: u32, height: u32, scale: f32, density: Option<f32>) -> Self {
        Self {
            width,
            height,
            half_width: width / 2,
            half_height: height / 2,
            scale,
            density,
        }
    }
}

/// Relative float comparison tolerant of accumulated rounding noise.
pub fn approx_eq(a: f32, b: f32) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0);
    (b - a).abs() < tolerance
}
