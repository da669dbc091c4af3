use winit::dpi::PhysicalPosition;
use winit::event::{Touch, TouchPhase as WinitTouchPhase, WindowEvent};
use winit::window::Window;

use crate::coords::Vec2;
use crate::host::DisplayMetrics;
use crate::input::{
    ListenerId, SharedListener, TouchDispatcher, TouchEventSource, TouchId, TouchPhase, TouchRecord,
};

/// Dots per inch of a display at scale factor 1.0.
///
/// winit reports no physical density, so it is derived from the scale factor.
pub const BASE_DPI: f32 = 96.0;

/// Display metrics tracked from winit window events.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WinitDisplay {
    scale_factor: f64,
    physical_height: u32,
}

impl WinitDisplay {
    pub fn new(window: &Window) -> Self {
        Self::from_parts(window.scale_factor(), window.inner_size().height)
    }

    pub fn from_parts(scale_factor: f64, physical_height: u32) -> Self {
        Self { scale_factor, physical_height }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Updates metrics from resize/scale events. Returns `true` if anything changed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                let changed = self.physical_height != size.height;
                self.physical_height = size.height;
                changed
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let changed = self.scale_factor != *scale_factor;
                self.scale_factor = *scale_factor;
                changed
            }
            _ => false,
        }
    }
}

impl DisplayMetrics for WinitDisplay {
    fn density(&self) -> f32 {
        self.scale_factor as f32 * BASE_DPI
    }

    fn screen_height(&self) -> f32 {
        (f64::from(self.physical_height) / self.scale_factor) as f32
    }
}

/// Touch source fed from winit `WindowEvent::Touch`.
///
/// Touches are queued as they arrive and delivered on [`flush`](Self::flush),
/// typically once per frame before rendering. Consecutive touches of the same
/// phase are delivered as one batch; phase order is preserved.
#[derive(Default)]
pub struct WinitTouchSource {
    dispatcher: TouchDispatcher,
    pending: Vec<(TouchPhase, TouchRecord)>,
}

impl WinitTouchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queues a touch event. Returns `true` if the event was a touch.
    pub fn handle_window_event(&mut self, display: &WinitDisplay, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Touch(touch) => {
                let (phase, record) = translate_touch(display, touch);
                self.queue(phase, record);
                true
            }
            _ => false,
        }
    }

    pub fn queue(&mut self, phase: TouchPhase, record: TouchRecord) {
        self.pending.push((phase, record));
    }

    /// Delivers everything queued since the last flush.
    pub fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let mut batch: Vec<TouchRecord> = Vec::with_capacity(pending.len());
        let mut current: Option<TouchPhase> = None;

        for (phase, record) in &pending {
            match current {
                Some(p) if p != *phase => {
                    self.dispatcher.dispatch(p, &batch);
                    batch.clear();
                }
                _ => {}
            }
            current = Some(*phase);
            batch.push(*record);
        }

        if let Some(p) = current {
            self.dispatcher.dispatch(p, &batch);
        }

        // Keep the allocation for the next frame.
        self.pending = pending;
        self.pending.clear();
    }
}

impl TouchEventSource for WinitTouchSource {
    fn subscribe(&mut self, listener: SharedListener) -> ListenerId {
        self.dispatcher.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.dispatcher.unsubscribe(id)
    }
}

/// Translates a winit touch into touch space (logical px, bottom-left origin).
pub fn translate_touch(display: &WinitDisplay, touch: &Touch) -> (TouchPhase, TouchRecord) {
    let position = to_touch_space(touch.location, display.scale_factor(), display.screen_height());
    let record = TouchRecord { id: TouchId(touch.id), position };
    (map_phase(touch.phase), record)
}

fn to_touch_space(pos: PhysicalPosition<f64>, scale: f64, logical_height: f32) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale);
    Vec2::new(logical.x as f32, logical.y as f32).flip_y(logical_height)
}

fn map_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Began,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended => TouchPhase::Ended,
        WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}
