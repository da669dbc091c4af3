use std::cell::RefCell;
use std::rc::Rc;

use super::types::{TouchPhase, TouchRecord};

/// Receiver of touch lifecycle notifications.
///
/// Each call carries the touches affected by one notification, in the order
/// the source reported them.
pub trait TouchListener {
    fn touches_began(&mut self, touches: &[TouchRecord]);
    fn touches_moved(&mut self, touches: &[TouchRecord]);
    fn touches_ended(&mut self, touches: &[TouchRecord]);
    fn touches_cancelled(&mut self, touches: &[TouchRecord]);
}

/// Listener handle shared between a source and its owner.
///
/// Input delivery and rendering run on the same thread, so `Rc<RefCell<_>>`
/// is sufficient.
pub type SharedListener = Rc<RefCell<dyn TouchListener>>;

/// Token returned by [`TouchEventSource::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

/// Host input source exposing began/moved/ended/cancelled channels.
pub trait TouchEventSource {
    /// Registers `listener` on all four channels.
    fn subscribe(&mut self, listener: SharedListener) -> ListenerId;

    /// Removes a listener. Returns `false` if `id` was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// In-memory fan-out of touch notifications to registered listeners.
///
/// Platform adapters wrap it; tests and trace replay drive it directly.
#[derive(Default)]
pub struct TouchDispatcher {
    listeners: Vec<(ListenerId, SharedListener)>,
    next_id: u64,
}

impl TouchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers one notification to every listener in subscription order.
    ///
    /// Empty batches are not delivered.
    pub fn dispatch(&self, phase: TouchPhase, touches: &[TouchRecord]) {
        if touches.is_empty() {
            return;
        }

        for (id, listener) in &self.listeners {
            let Ok(mut listener) = listener.try_borrow_mut() else {
                log::warn!("listener {:?} is busy; dropping {phase} notification", id);
                continue;
            };

            match phase {
                TouchPhase::Began => listener.touches_began(touches),
                TouchPhase::Moved => listener.touches_moved(touches),
                TouchPhase::Ended => listener.touches_ended(touches),
                TouchPhase::Cancelled => listener.touches_cancelled(touches),
            }
        }
    }
}

impl TouchEventSource for TouchDispatcher {
    fn subscribe(&mut self, listener: SharedListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}
