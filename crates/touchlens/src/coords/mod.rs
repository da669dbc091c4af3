//! Coordinate and geometry types shared by the tracker and the overlay renderer.
//!
//! Two spaces are in play:
//! - touch space: logical pixels, origin bottom-left, +Y up (what input sources report)
//! - draw space: logical pixels, origin top-left, +Y down (what draw sinks consume)
//!
//! [`Vec2::flip_y`] converts between them given the screen height.

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
