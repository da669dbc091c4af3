use std::fmt;

use crate::coords::Vec2;

/// Identifier of a single contact, assigned by the input source.
///
/// Unique among currently active touches; sources may recycle it once the
/// contact ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TouchId(pub u64);

/// Lifecycle notification kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Last known state of one contact.
///
/// `position` is in touch space (logical pixels, bottom-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchRecord {
    pub id: TouchId,
    pub position: Vec2,
}

impl TouchRecord {
    #[inline]
    pub const fn new(id: u64, x: f32, y: f32) -> Self {
        Self { id: TouchId(id), position: Vec2::new(x, y) }
    }
}

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for TouchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TouchPhase::Began => "began",
            TouchPhase::Moved => "moved",
            TouchPhase::Ended => "ended",
            TouchPhase::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}
