//! Recorded draw stream.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)
//! - act as a [`DrawSink`](crate::host::DrawSink) for hosts that paint later

mod cmd;
mod key;
mod list;
mod z_index;

pub use cmd::{DrawCmd, TextureCmd};
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use z_index::ZIndex;
