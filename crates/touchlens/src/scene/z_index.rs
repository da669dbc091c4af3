/// Z-ordering key for draw items.
///
/// Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer above everything else; debug markers live here.
    pub const OVERLAY: ZIndex = ZIndex(i32::MAX);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}
