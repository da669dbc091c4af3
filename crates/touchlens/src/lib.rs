//! Touchlens: a debug overlay that draws a marker under every active touch.
//!
//! The overlay consumes touch notifications from an injected source, keeps
//! the set of active contacts, and emits one textured rectangle per contact
//! each frame, sized either to a fixed 32 px or to a physical size in
//! centimeters using the display density.

pub mod coords;
pub mod host;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod scene;
pub mod texture;
