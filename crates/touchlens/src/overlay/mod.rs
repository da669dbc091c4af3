//! Touch debug overlay.
//!
//! [`TouchDebugger`] is the component hosts embed: it owns a [`TouchTracker`]
//! fed by an injected input source and an [`OverlayRenderer`] that turns the
//! tracked set into one textured rectangle per touch each frame.
//!
//! [`TouchTracker`]: crate::input::TouchTracker

mod config;
mod debugger;
mod error;
mod renderer;
mod sizing;

pub use config::OverlayConfig;
pub use debugger::{SharedSource, TouchDebugger};
pub use error::OverlayError;
pub use renderer::OverlayRenderer;
pub use sizing::{approx_eq, SizingState, FIXED_MARKER_PX, FIXED_SCALE, INCH_TO_CM};
