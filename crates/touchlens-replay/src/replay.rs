//! Drives the overlay through a recorded trace, frame by frame.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Serialize;

use touchlens::host::StaticDisplay;
use touchlens::input::{TouchDispatcher, TouchRecord};
use touchlens::overlay::{OverlayConfig, SharedSource, TouchDebugger};
use touchlens::scene::{DrawCmd, DrawList};
use touchlens::texture::{MarkerTexture, TextureId};

use crate::trace::{OverlaySpec, Trace};

const MARKER_TEXTURE_ID: TextureId = TextureId(1);

/// Draw calls issued during one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub frame: usize,
    pub markers: Vec<Marker>,
}

/// Destination rectangle of one marker, in draw space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Replays `trace`; relative texture paths resolve against `base_dir`.
pub fn replay(trace: &Trace, base_dir: &Path) -> Result<Vec<FrameOutput>> {
    let display = StaticDisplay::new(trace.display.density, trace.display.screen_height);
    let source = Rc::new(RefCell::new(TouchDispatcher::new()));
    let shared: SharedSource = source.clone();

    let mut debugger = TouchDebugger::new(OverlayConfig::default(), display, Some(shared))?;
    configure(&mut debugger, &trace.overlay, base_dir)?;

    if let Err(err) = debugger.start() {
        log::warn!("overlay inert for this replay: {err}");
    }

    let mut list = DrawList::new();
    let mut out = Vec::with_capacity(trace.frames.len());

    for (index, frame) in trace.frames.iter().enumerate() {
        if let Some(density) = frame.density {
            debugger.display_mut().density = density;
        }
        if let Some(height) = frame.screen_height {
            debugger.display_mut().screen_height = height;
        }

        for event in &frame.events {
            let touches: Vec<TouchRecord> = event.touches.iter().copied().map(TouchRecord::from).collect();
            source.borrow().dispatch(event.phase.into(), &touches);
        }

        list.clear();
        let drawn = debugger.render(&mut list);
        log::debug!("frame {index}: {drawn} marker(s)");

        out.push(FrameOutput { frame: index, markers: collect_markers(&mut list) });
    }

    debugger.stop();
    Ok(out)
}

fn configure(debugger: &mut TouchDebugger<StaticDisplay>, spec: &OverlaySpec, base_dir: &Path) -> Result<()> {
    debugger.set_use_density_scaling(spec.use_density_scaling);
    debugger.set_marker_size_cm(spec.marker_size_cm)?;
    debugger.set_miss_policy(spec.miss_policy.into());

    let texture = match (&spec.texture_path, spec.texture) {
        (Some(path), _) => Some(
            MarkerTexture::from_file(MARKER_TEXTURE_ID, base_dir.join(path))
                .context("failed to load overlay texture")?,
        ),
        (None, Some(size)) => Some(MarkerTexture::new(MARKER_TEXTURE_ID, size.width, size.height)),
        (None, None) => None,
    };
    debugger.set_texture(texture)?;
    Ok(())
}

/// Markers sorted left-to-right, then top-to-bottom, so output is stable.
fn collect_markers(list: &mut DrawList) -> Vec<Marker> {
    let mut markers: Vec<Marker> = list
        .iter_in_paint_order()
        .map(|item| match &item.cmd {
            DrawCmd::Texture(cmd) => Marker {
                x: cmd.rect.origin.x,
                y: cmd.rect.origin.y,
                width: cmd.rect.size.x,
                height: cmd.rect.size.y,
            },
        })
        .collect();

    markers.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(json: &str) -> Vec<FrameOutput> {
        let trace = Trace::parse(json).unwrap();
        replay(&trace, Path::new(".")).unwrap()
    }

    #[test]
    fn fixed_mode_marker_is_flipped_and_centered() {
        let out = run(
            r#"{
                "display": { "density": 160, "screen_height": 800 },
                "overlay": { "texture": { "width": 256, "height": 256 }, "use_density_scaling": false },
                "frames": [
                    { "events": [ { "phase": "began", "touches": [ { "id": 1, "x": 100, "y": 50 } ] } ] },
                    { "events": [ { "phase": "ended", "touches": [ { "id": 1, "x": 100, "y": 50 } ] } ] }
                ]
            }"#,
        );

        assert_eq!(out[0].markers, vec![Marker { x: 84.0, y: 734.0, width: 32.0, height: 32.0 }]);
        assert!(out[1].markers.is_empty());
    }

    #[test]
    fn density_override_resizes_markers() {
        let out = run(
            r#"{
                "display": { "density": 160, "screen_height": 800 },
                "overlay": { "texture": { "width": 256, "height": 256 } },
                "frames": [
                    { "events": [ { "phase": "began", "touches": [ { "id": 1, "x": 400, "y": 400 } ] } ] },
                    { "density": 320 }
                ]
            }"#,
        );

        assert_eq!(out[0].markers[0].width, 62.0);
        assert!(out[1].markers[0].width >= 125.0);
    }

    #[test]
    fn missing_texture_replays_with_no_markers() {
        let out = run(
            r#"{
                "display": { "density": 160, "screen_height": 800 },
                "frames": [
                    { "events": [ { "phase": "began", "touches": [ { "id": 1, "x": 10, "y": 10 } ] } ] },
                    {}
                ]
            }"#,
        );

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| f.markers.is_empty()));
    }

    #[test]
    fn skip_touch_policy_keeps_processing_batch() {
        let json = |policy: &str| {
            format!(
                r#"{{
                    "display": {{ "density": 160, "screen_height": 800 }},
                    "overlay": {{ "texture": {{ "width": 8, "height": 8 }}, "use_density_scaling": false, "miss_policy": "{policy}" }},
                    "frames": [
                        {{ "events": [
                            {{ "phase": "began", "touches": [ {{ "id": 1, "x": 100, "y": 100 }} ] }},
                            {{ "phase": "ended", "touches": [ {{ "id": 7, "x": 0, "y": 0 }}, {{ "id": 1, "x": 0, "y": 0 }} ] }}
                        ] }}
                    ]
                }}"#
            )
        };

        assert_eq!(run(&json("abort_batch"))[0].markers.len(), 1);
        assert!(run(&json("skip_touch"))[0].markers.is_empty());
    }

    #[test]
    fn bad_marker_size_is_an_error() {
        let trace = Trace::parse(
            r#"{ "display": { "density": 160, "screen_height": 800 }, "overlay": { "marker_size_cm": 0 } }"#,
        )
        .unwrap();
        assert!(replay(&trace, Path::new(".")).is_err());
    }
}
