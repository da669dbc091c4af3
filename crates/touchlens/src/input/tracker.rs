use std::collections::HashMap;

use super::source::TouchListener;
use super::types::{TouchId, TouchPhase, TouchRecord};

/// Simultaneous contacts the map is pre-sized for.
const EXPECTED_TOUCHES: usize = 10;

/// What a move/end/cancel batch does when it names an untracked touch.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum MissPolicy {
    /// Stop processing the rest of the batch at the first unknown id.
    ///
    /// Touches earlier in the batch keep their updates; later ones are dropped
    /// even if they are tracked.
    #[default]
    AbortBatch,
    /// Ignore the unknown id and continue with the next touch.
    SkipTouch,
}

/// Set of currently active touches, keyed by id.
///
/// An id is present exactly while its contact is between a began and an
/// ended/cancelled notification. Only the four `on_*` handlers mutate it.
#[derive(Debug)]
pub struct TouchTracker {
    touches: HashMap<TouchId, TouchRecord>,
    miss_policy: MissPolicy,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(MissPolicy::default())
    }
}

impl TouchTracker {
    pub fn new(miss_policy: MissPolicy) -> Self {
        Self {
            touches: HashMap::with_capacity(EXPECTED_TOUCHES),
            miss_policy,
        }
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    pub fn set_miss_policy(&mut self, policy: MissPolicy) {
        self.miss_policy = policy;
    }

    /// Starts tracking every touch in the batch.
    ///
    /// Ids are expected to be fresh. A repeated id replaces the stored record.
    pub fn on_begin(&mut self, touches: &[TouchRecord]) {
        for touch in touches {
            if self.touches.insert(touch.id, *touch).is_some() {
                log::debug!("touch {} began while already tracked; replacing", touch.id);
            }
        }
    }

    /// Updates positions of tracked touches.
    pub fn on_move(&mut self, touches: &[TouchRecord]) {
        for touch in touches {
            match self.touches.get_mut(&touch.id) {
                Some(tracked) => *tracked = *touch,
                None => {
                    if self.should_abort(touch.id, TouchPhase::Moved) {
                        return;
                    }
                }
            }
        }
    }

    /// Stops tracking every touch in the batch.
    pub fn on_end(&mut self, touches: &[TouchRecord]) {
        self.remove_batch(touches, TouchPhase::Ended);
    }

    /// Cancellation is bookkept exactly like a normal end.
    pub fn on_cancel(&mut self, touches: &[TouchRecord]) {
        self.remove_batch(touches, TouchPhase::Cancelled);
    }

    /// Iterates the active touches in no particular order.
    pub fn active_touches(&self) -> impl Iterator<Item = &TouchRecord> {
        self.touches.values()
    }

    pub fn get(&self, id: TouchId) -> Option<&TouchRecord> {
        self.touches.get(&id)
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.touches.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Forgets every tracked touch.
    pub fn clear(&mut self) {
        self.touches.clear();
    }

    fn remove_batch(&mut self, touches: &[TouchRecord], phase: TouchPhase) {
        for touch in touches {
            if self.touches.remove(&touch.id).is_none() && self.should_abort(touch.id, phase) {
                return;
            }
        }
    }

    fn should_abort(&self, id: TouchId, phase: TouchPhase) -> bool {
        match self.miss_policy {
            MissPolicy::AbortBatch => {
                log::debug!("{phase} batch names untracked touch {id}; dropping rest of batch");
                true
            }
            MissPolicy::SkipTouch => {
                log::debug!("{phase} batch names untracked touch {id}; skipping it");
                false
            }
        }
    }
}

impl TouchListener for TouchTracker {
    fn touches_began(&mut self, touches: &[TouchRecord]) {
        self.on_begin(touches);
    }

    fn touches_moved(&mut self, touches: &[TouchRecord]) {
        self.on_move(touches);
    }

    fn touches_ended(&mut self, touches: &[TouchRecord]) {
        self.on_end(touches);
    }

    fn touches_cancelled(&mut self, touches: &[TouchRecord]) {
        self.on_cancel(touches);
    }
}
