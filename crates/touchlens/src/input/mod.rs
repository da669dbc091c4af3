//! Touch input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform adapters under `platform` translate native events into
//! [`TouchRecord`] batches and deliver them through [`TouchEventSource`].

pub mod platform;

mod source;
mod tracker;
mod types;

pub use source::{ListenerId, SharedListener, TouchDispatcher, TouchEventSource, TouchListener};
pub use tracker::{MissPolicy, TouchTracker};
pub use types::{TouchId, TouchPhase, TouchRecord};
