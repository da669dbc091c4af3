use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::host::{DisplayMetrics, DrawSink};
use crate::input::{ListenerId, MissPolicy, TouchEventSource, TouchListener, TouchRecord, TouchTracker};
use crate::texture::MarkerTexture;

use super::{OverlayConfig, OverlayError, OverlayRenderer, SizingState};

/// Input source handle injected into the overlay.
pub type SharedSource = Rc<RefCell<dyn TouchEventSource>>;

/// Listener registered with the source on behalf of the tracker.
///
/// Notifications are dropped while `listening` is off, so a stopped overlay
/// ignores a subscription it could not release yet.
struct TrackerFeed {
    tracker: Rc<RefCell<TouchTracker>>,
    listening: Rc<Cell<bool>>,
}

impl TrackerFeed {
    fn forward(&self, f: impl FnOnce(&mut TouchTracker)) {
        if !self.listening.get() {
            return;
        }
        match self.tracker.try_borrow_mut() {
            Ok(mut tracker) => f(&mut *tracker),
            Err(_) => log::warn!("touch tracker is busy; dropping notification"),
        }
    }
}

impl TouchListener for TrackerFeed {
    fn touches_began(&mut self, touches: &[TouchRecord]) {
        self.forward(|t| t.on_begin(touches));
    }

    fn touches_moved(&mut self, touches: &[TouchRecord]) {
        self.forward(|t| t.on_move(touches));
    }

    fn touches_ended(&mut self, touches: &[TouchRecord]) {
        self.forward(|t| t.on_end(touches));
    }

    fn touches_cancelled(&mut self, touches: &[TouchRecord]) {
        self.forward(|t| t.on_cancel(touches));
    }
}

/// Touch debug overlay component.
///
/// Lifecycle:
/// - `start()` subscribes the internal tracker to the injected source
/// - `render()` is called once per frame and draws one marker per active touch
/// - `stop()` unsubscribes and forgets tracked touches
///
/// Both `start()` and `stop()` are idempotent. A missing source is tolerated:
/// the overlay starts but never sees any touches.
///
/// `stop()` may run while the source is dispatching (from another listener).
/// The overlay then stops tracking at once and releases the subscription on
/// the next `render()`, `stop()` or drop; a `start()` in between reuses it.
pub struct TouchDebugger<D: DisplayMetrics> {
    renderer: OverlayRenderer,
    tracker: Rc<RefCell<TouchTracker>>,
    listening: Rc<Cell<bool>>,
    source: Option<SharedSource>,
    subscription: Option<ListenerId>,
    active: bool,
    display: D,
}

impl<D: DisplayMetrics> TouchDebugger<D> {
    /// Fails if `config` holds values the setters would reject.
    pub fn new(config: OverlayConfig, display: D, source: Option<SharedSource>) -> Result<Self, OverlayError> {
        let tracker = TouchTracker::new(config.miss_policy);
        let renderer = OverlayRenderer::new(config, display.density())?;
        Ok(Self {
            renderer,
            tracker: Rc::new(RefCell::new(tracker)),
            listening: Rc::new(Cell::new(false)),
            source,
            subscription: None,
            active: false,
            display,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &OverlayConfig {
        self.renderer.config()
    }

    pub fn sizing(&self) -> &SizingState {
        self.renderer.sizing()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display; density changes are picked up on the next frame.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Shared handle to the tracked touch set.
    pub fn tracker(&self) -> Rc<RefCell<TouchTracker>> {
        Rc::clone(&self.tracker)
    }

    /// Activates the overlay.
    ///
    /// Fails with [`OverlayError::MissingTexture`] when no texture is
    /// configured; the overlay then stays inert.
    pub fn start(&mut self) -> Result<(), OverlayError> {
        if self.active {
            return Ok(());
        }

        if self.renderer.texture().is_none() {
            log::error!("{}", OverlayError::MissingTexture);
            return Err(OverlayError::MissingTexture);
        }

        self.renderer.recompute(self.display.density());

        match (&self.source, self.subscription) {
            (_, Some(_)) => log::debug!("touch debugger resumed its pending subscription"),
            (Some(source), None) => match source.try_borrow_mut() {
                Ok(mut source) => {
                    let feed = TrackerFeed {
                        tracker: Rc::clone(&self.tracker),
                        listening: Rc::clone(&self.listening),
                    };
                    self.subscription = Some(source.subscribe(Rc::new(RefCell::new(feed))));
                    log::debug!("touch debugger subscribed to input source");
                }
                Err(_) => log::warn!("touch input source is busy; overlay will not receive touches"),
            },
            (None, None) => log::warn!("no touch input source available; overlay will not receive touches"),
        }

        self.listening.set(true);
        self.active = true;
        Ok(())
    }

    /// Deactivates the overlay and forgets every tracked touch.
    pub fn stop(&mut self) {
        if self.active {
            self.listening.set(false);
            if let Ok(mut tracker) = self.tracker.try_borrow_mut() {
                tracker.clear();
            }
            self.active = false;
        }
        self.release_subscription();
    }

    /// Unsubscribes if a subscription is held while inactive.
    ///
    /// The id is kept when the source is busy so a later call can retry.
    fn release_subscription(&mut self) {
        if self.active {
            return;
        }
        let (Some(id), Some(source)) = (self.subscription, &self.source) else {
            return;
        };

        match source.try_borrow_mut() {
            Ok(mut source) => {
                source.unsubscribe(id);
                self.subscription = None;
                log::debug!("touch debugger unsubscribed from input source");
            }
            Err(_) => log::debug!("touch input source is busy; unsubscribe deferred"),
        }
    }

    /// Draws one marker per active touch. Returns the number of draw calls.
    pub fn render(&mut self, sink: &mut dyn DrawSink) -> usize {
        self.release_subscription();
        let tracker = self.tracker.borrow();
        self.renderer.render(&tracker, &self.display, sink)
    }

    pub fn set_texture(&mut self, texture: Option<MarkerTexture>) -> Result<(), OverlayError> {
        self.renderer.set_texture(texture, self.display.density())
    }

    pub fn set_use_density_scaling(&mut self, enabled: bool) {
        self.renderer.set_use_density_scaling(enabled, self.display.density());
    }

    pub fn set_marker_size_cm(&mut self, cm: f32) -> Result<(), OverlayError> {
        self.renderer.set_marker_size_cm(cm, self.display.density())
    }

    pub fn set_miss_policy(&mut self, policy: MissPolicy) {
        self.renderer.set_miss_policy(policy);
        self.tracker.borrow_mut().set_miss_policy(policy);
    }
}

impl<D: DisplayMetrics> Drop for TouchDebugger<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Weak;

    use super::*;
    use crate::coords::Vec2;
    use crate::host::StaticDisplay;
    use crate::input::{TouchDispatcher, TouchPhase};
    use crate::scene::{DrawCmd, DrawList};
    use crate::texture::TextureId;

    fn tex() -> MarkerTexture { MarkerTexture::new(TextureId(9), 256, 256) }

    fn setup(config: OverlayConfig) -> (TouchDebugger<StaticDisplay>, Rc<RefCell<TouchDispatcher>>) {
        let source = Rc::new(RefCell::new(TouchDispatcher::new()));
        let shared: SharedSource = source.clone();
        let debugger = TouchDebugger::new(config, StaticDisplay::new(160.0, 800.0), Some(shared)).unwrap();
        (debugger, source)
    }

    fn fixed() -> OverlayConfig {
        OverlayConfig { use_density_scaling: false, ..OverlayConfig::with_texture(tex()) }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn start_subscribes_once() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        dbg.start().unwrap();
        assert!(dbg.is_active());
        assert_eq!(source.borrow().listener_count(), 1);
    }

    #[test]
    fn stop_unsubscribes_and_is_idempotent() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        dbg.stop();
        dbg.stop();
        assert!(!dbg.is_active());
        assert_eq!(source.borrow().listener_count(), 0);
    }

    #[test]
    fn restart_after_stop_resubscribes() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        dbg.stop();
        dbg.start().unwrap();
        assert_eq!(source.borrow().listener_count(), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        drop(dbg);
        assert_eq!(source.borrow().listener_count(), 0);
    }

    #[test]
    fn stop_forgets_touches() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(1, 0.0, 0.0)]);
        dbg.stop();
        assert!(dbg.tracker().borrow().is_empty());
    }

    struct StopOnBegin(Weak<RefCell<TouchDebugger<StaticDisplay>>>);

    impl TouchListener for StopOnBegin {
        fn touches_began(&mut self, _: &[TouchRecord]) {
            if let Some(dbg) = self.0.upgrade() {
                dbg.borrow_mut().stop();
            }
        }
        fn touches_moved(&mut self, _: &[TouchRecord]) {}
        fn touches_ended(&mut self, _: &[TouchRecord]) {}
        fn touches_cancelled(&mut self, _: &[TouchRecord]) {}
    }

    fn stopped_from_callback() -> (Rc<RefCell<TouchDebugger<StaticDisplay>>>, Rc<RefCell<TouchDispatcher>>) {
        let (dbg, source) = setup(fixed());
        let dbg = Rc::new(RefCell::new(dbg));
        source.borrow_mut().subscribe(Rc::new(RefCell::new(StopOnBegin(Rc::downgrade(&dbg)))));
        dbg.borrow_mut().start().unwrap();

        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(1, 0.0, 0.0)]);
        (dbg, source)
    }

    #[test]
    fn stop_during_dispatch_stops_tracking() {
        let (dbg, source) = stopped_from_callback();
        assert!(!dbg.borrow().is_active());
        assert!(dbg.borrow().tracker().borrow().is_empty());

        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(2, 0.0, 0.0)]);
        assert!(dbg.borrow().tracker().borrow().is_empty());
    }

    #[test]
    fn stop_during_dispatch_releases_subscription_later() {
        let (dbg, source) = stopped_from_callback();
        // Stopper plus the subscription still waiting to be released.
        assert_eq!(source.borrow().listener_count(), 2);

        dbg.borrow_mut().render(&mut DrawList::new());
        assert_eq!(source.borrow().listener_count(), 1);

        dbg.borrow_mut().start().unwrap();
        assert_eq!(source.borrow().listener_count(), 2);
    }

    #[test]
    fn restart_after_stop_during_dispatch_reuses_subscription() {
        let (dbg, source) = stopped_from_callback();
        dbg.borrow_mut().start().unwrap();
        assert_eq!(source.borrow().listener_count(), 2);

        source.borrow().dispatch(TouchPhase::Moved, &[TouchRecord::new(1, 0.0, 0.0)]);
        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(3, 0.0, 0.0)]);
        // The began batch stops the overlay again before the tracker sees it.
        assert!(dbg.borrow().tracker().borrow().is_empty());
        assert_eq!(source.borrow().listener_count(), 2);

        dbg.borrow_mut().stop();
        assert_eq!(source.borrow().listener_count(), 1);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = OverlayConfig { marker_size_cm: 0.0, ..fixed() };
        let result = TouchDebugger::new(config, StaticDisplay::new(160.0, 800.0), None);
        assert!(matches!(result, Err(OverlayError::InvalidMarkerSize(_))));
    }

    // ── guards ────────────────────────────────────────────────────────────

    #[test]
    fn start_without_texture_is_refused() {
        let (mut dbg, source) = setup(OverlayConfig::default());
        assert_eq!(dbg.start(), Err(OverlayError::MissingTexture));
        assert!(!dbg.is_active());
        assert_eq!(source.borrow().listener_count(), 0);

        let mut list = DrawList::new();
        for _ in 0..3 {
            assert_eq!(dbg.render(&mut list), 0);
        }
        assert!(list.is_empty());
    }

    #[test]
    fn start_without_source_is_tolerated() {
        let mut dbg = TouchDebugger::new(fixed(), StaticDisplay::new(160.0, 800.0), None).unwrap();
        assert!(dbg.start().is_ok());
        assert!(dbg.is_active());

        let mut list = DrawList::new();
        assert_eq!(dbg.render(&mut list), 0);
        dbg.stop();
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn dispatched_touches_are_drawn() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();

        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(1, 90.0, 40.0)]);
        source.borrow().dispatch(TouchPhase::Moved, &[TouchRecord::new(1, 100.0, 50.0)]);

        let mut list = DrawList::new();
        assert_eq!(dbg.render(&mut list), 1);
        let DrawCmd::Texture(cmd) = &list.items()[0].cmd;
        assert_eq!(cmd.rect.origin, Vec2::new(84.0, 734.0));
        assert_eq!(cmd.texture, tex());

        source.borrow().dispatch(TouchPhase::Cancelled, &[TouchRecord::new(1, 0.0, 0.0)]);
        list.clear();
        assert_eq!(dbg.render(&mut list), 0);
    }

    #[test]
    fn stopped_overlay_ignores_dispatch() {
        let (mut dbg, source) = setup(fixed());
        dbg.start().unwrap();
        dbg.stop();
        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(1, 0.0, 0.0)]);
        assert!(dbg.tracker().borrow().is_empty());
    }

    // ── configuration ─────────────────────────────────────────────────────

    #[test]
    fn display_density_change_resizes_markers() {
        let (mut dbg, _source) = setup(OverlayConfig::with_texture(tex()));
        dbg.start().unwrap();
        assert_eq!(dbg.sizing().width, 62);

        dbg.display_mut().density = 320.0;
        dbg.render(&mut DrawList::new());
        assert!((125..=126).contains(&dbg.sizing().width));
    }

    #[test]
    fn setters_recompute_with_current_density() {
        let (mut dbg, _source) = setup(OverlayConfig::with_texture(tex()));
        dbg.set_use_density_scaling(false);
        assert_eq!(dbg.sizing().width, 32);

        dbg.set_use_density_scaling(true);
        dbg.set_marker_size_cm(2.0).unwrap();
        assert!((125..=126).contains(&dbg.sizing().width));
        assert!(dbg.set_marker_size_cm(-1.0).is_err());
    }

    #[test]
    fn miss_policy_reaches_tracker() {
        let (mut dbg, source) = setup(fixed());
        dbg.set_miss_policy(MissPolicy::SkipTouch);
        dbg.start().unwrap();

        source.borrow().dispatch(TouchPhase::Began, &[TouchRecord::new(1, 0.0, 0.0)]);
        source.borrow().dispatch(TouchPhase::Moved, &[TouchRecord::new(5, 0.0, 0.0), TouchRecord::new(1, 3.0, 3.0)]);

        assert_eq!(dbg.config().miss_policy, MissPolicy::SkipTouch);
        let tracker = dbg.tracker();
        assert_eq!(tracker.borrow().active_touches().next().unwrap().position, Vec2::new(3.0, 3.0));
    }
}
