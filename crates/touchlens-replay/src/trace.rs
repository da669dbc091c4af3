//! Recorded touch trace format.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use touchlens::input::{MissPolicy, TouchPhase, TouchRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    pub display: DisplaySpec,
    #[serde(default)]
    pub overlay: OverlaySpec,
    #[serde(default)]
    pub frames: Vec<FrameSpec>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct DisplaySpec {
    pub density: f32,
    pub screen_height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlaySpec {
    pub texture: Option<TextureSize>,
    /// Image file; relative paths resolve against the trace's directory.
    pub texture_path: Option<PathBuf>,
    pub use_density_scaling: bool,
    pub marker_size_cm: f32,
    pub miss_policy: MissPolicyName,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            texture: None,
            texture_path: None,
            use_density_scaling: true,
            marker_size_cm: 1.0,
            miss_policy: MissPolicyName::AbortBatch,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicyName {
    #[default]
    AbortBatch,
    SkipTouch,
}

impl From<MissPolicyName> for MissPolicy {
    fn from(name: MissPolicyName) -> Self {
        match name {
            MissPolicyName::AbortBatch => MissPolicy::AbortBatch,
            MissPolicyName::SkipTouch => MissPolicy::SkipTouch,
        }
    }
}

/// One host frame: notifications delivered, then a render tick.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrameSpec {
    /// Overrides the display density from this frame on.
    pub density: Option<f32>,
    /// Overrides the screen height from this frame on.
    pub screen_height: Option<f32>,
    pub events: Vec<EventSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSpec {
    pub phase: PhaseName,
    pub touches: Vec<TouchSpec>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Began,
    Moved,
    Ended,
    Cancelled,
}

impl From<PhaseName> for TouchPhase {
    fn from(name: PhaseName) -> Self {
        match name {
            PhaseName::Began => TouchPhase::Began,
            PhaseName::Moved => TouchPhase::Moved,
            PhaseName::Ended => TouchPhase::Ended,
            PhaseName::Cancelled => TouchPhase::Cancelled,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct TouchSpec {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl From<TouchSpec> for TouchRecord {
    fn from(t: TouchSpec) -> Self {
        TouchRecord::new(t.id, t.x, t.y)
    }
}

impl Trace {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid touch trace")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read trace {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_trace() {
        let trace = Trace::parse(
            r#"{
                "display": { "density": 160, "screen_height": 800 },
                "overlay": { "texture": { "width": 256, "height": 128 }, "use_density_scaling": false, "miss_policy": "skip_touch" },
                "frames": [
                    { "events": [ { "phase": "began", "touches": [ { "id": 1, "x": 100, "y": 50 } ] } ] },
                    { "density": 320, "events": [ { "phase": "cancelled", "touches": [ { "id": 1, "x": 0, "y": 0 } ] } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(trace.display.screen_height, 800.0);
        assert!(!trace.overlay.use_density_scaling);
        assert_eq!(trace.overlay.marker_size_cm, 1.0);
        assert_eq!(trace.overlay.miss_policy, MissPolicyName::SkipTouch);
        assert_eq!(trace.frames.len(), 2);
        assert_eq!(trace.frames[0].events[0].phase, PhaseName::Began);
        assert_eq!(trace.frames[1].density, Some(320.0));
    }

    #[test]
    fn overlay_defaults_apply() {
        let trace = Trace::parse(r#"{ "display": { "density": 96, "screen_height": 600 } }"#).unwrap();
        assert!(trace.overlay.use_density_scaling);
        assert!(trace.overlay.texture.is_none());
        assert!(trace.frames.is_empty());
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let err = Trace::parse(
            r#"{ "display": { "density": 96, "screen_height": 600 },
                 "frames": [ { "events": [ { "phase": "hover", "touches": [] } ] } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid touch trace"));
    }
}
