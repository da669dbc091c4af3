use crate::coords::Rect;
use crate::host::{DrawSink, ScaleMode};
use crate::texture::MarkerTexture;

use super::{DrawCmd, SortKey, TextureCmd, ZIndex};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Draw stream recorded for one frame.
///
/// Commands arriving through [`DrawSink`] are placed on `sink_layer`
/// (top-most by default).
#[derive(Debug)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,
    sink_layer: ZIndex,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_order: 0,
            sink_layer: ZIndex::OVERLAY,
            sorted_indices: Vec::new(),
            sorted_dirty: false,
        }
    }
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = false;
    }

    #[inline]
    pub fn set_sink_layer(&mut self, z: ZIndex) {
        self.sink_layer = z;
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { key: SortKey::new(z, order), cmd });
        self.sorted_dirty = true;
    }

    /// Records a textured rectangle.
    #[inline]
    pub fn push_texture(&mut self, z: ZIndex, rect: Rect, texture: MarkerTexture, scale_mode: ScaleMode) {
        self.push(z, DrawCmd::Texture(TextureCmd { rect, texture, scale_mode }));
    }

    /// Iterates items back-to-front without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted_indices.clear();
            self.sorted_indices.extend(0..self.items.len());
            let items = &self.items;
            self.sorted_indices.sort_by(|&a, &b| items[a].key.cmp(&items[b].key));
            self.sorted_dirty = false;
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }
}

impl DrawSink for DrawList {
    fn draw_texture(&mut self, rect: Rect, texture: &MarkerTexture, mode: ScaleMode) {
        self.push_texture(self.sink_layer, rect, *texture, mode);
    }
}
