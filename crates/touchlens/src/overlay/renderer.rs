use crate::coords::Rect;
use crate::host::{DisplayMetrics, DrawSink};
use crate::input::{MissPolicy, TouchRecord, TouchTracker};
use crate::texture::MarkerTexture;

use super::config::{check_marker_size, check_texture};
use super::{OverlayConfig, OverlayError, SizingState};

/// Owns overlay configuration and the marker geometry derived from it.
///
/// Every setter recomputes [`SizingState`] from scratch for the density passed
/// in. During rendering the geometry is also refreshed when a density-scaled
/// marker sees the display density change.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    config: OverlayConfig,
    sizing: SizingState,
}

impl OverlayRenderer {
    /// Fails on the same values the setters reject.
    pub fn new(config: OverlayConfig, density: f32) -> Result<Self, OverlayError> {
        config.validate()?;
        let sizing = SizingState::compute(&config, density);
        Ok(Self { config, sizing })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn sizing(&self) -> &SizingState {
        &self.sizing
    }

    pub fn texture(&self) -> Option<&MarkerTexture> {
        self.config.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Option<MarkerTexture>, density: f32) -> Result<(), OverlayError> {
        check_texture(texture.as_ref())?;
        self.config.texture = texture;
        self.recompute(density);
        Ok(())
    }

    pub fn set_use_density_scaling(&mut self, enabled: bool, density: f32) {
        self.config.use_density_scaling = enabled;
        self.recompute(density);
    }

    pub fn set_marker_size_cm(&mut self, cm: f32, density: f32) -> Result<(), OverlayError> {
        check_marker_size(cm)?;
        self.config.marker_size_cm = cm;
        self.recompute(density);
        Ok(())
    }

    pub(crate) fn set_miss_policy(&mut self, policy: MissPolicy) {
        self.config.miss_policy = policy;
    }

    /// Rebuilds the marker geometry.
    pub fn recompute(&mut self, density: f32) {
        self.sizing = SizingState::compute(&self.config, density);
        log::debug!(
            "marker sizing: {}x{} px (scale {:.4}, density {:?})",
            self.sizing.width,
            self.sizing.height,
            self.sizing.scale,
            self.sizing.density,
        );
    }

    /// Recomputes if the display density moved since the last computation.
    ///
    /// Returns `true` when a recompute happened.
    pub fn refresh_density(&mut self, density: f32) -> bool {
        if !self.config.use_density_scaling || !self.sizing.is_stale(density) {
            return false;
        }
        log::debug!("display density changed to {density}");
        self.recompute(density);
        true
    }

    /// Draw-space rectangle for a touch on a screen `screen_height` tall.
    ///
    /// Touch space has its origin at the bottom, draw space at the top, so the
    /// vertical axis is flipped before centering the marker.
    pub fn marker_rect(&self, touch: &TouchRecord, screen_height: f32) -> Rect {
        Rect::around(
            touch.position.flip_y(screen_height),
            self.sizing.half_size(),
            self.sizing.size(),
        )
    }

    /// Emits one marker per active touch. Returns the number of draw calls.
    ///
    /// Does nothing when no texture is configured.
    pub fn render(
        &mut self,
        tracker: &TouchTracker,
        display: &dyn DisplayMetrics,
        sink: &mut dyn DrawSink,
    ) -> usize {
        let Some(texture) = self.config.texture else {
            return 0;
        };

        self.refresh_density(display.density());

        let screen_height = display.screen_height();
        let mut drawn = 0;
        for touch in tracker.active_touches() {
            sink.draw_texture(self.marker_rect(touch, screen_height), &texture, self.config.scale_mode);
            drawn += 1;
        }
        drawn
    }
}
