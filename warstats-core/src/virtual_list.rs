//! Windowed rendering for long uniform-height lists.
//!
//! A [`VirtualList`] owns a scroll position over an arbitrarily long item
//! sequence but only ever materializes a bounded window of it: roughly 2.5
//! viewports' worth of rows around the scroll position. Everything outside
//! that window is represented by the scroller alone, a full-height spacer
//! whose extent (`item_height * total_rows`) gives the scrollbar its size.
//!
//! Repaints are throttled. A scroll only re-renders the window when the
//! offset has moved more than one viewport (`max_buffer`) away from the
//! offset of the last repaint; between repaints the rows already mounted
//! around the viewport cover it. Each repaint replaces the mounted chunk
//! wholesale, so no row positioned for an older window survives.
//!
//! Units are abstract: the same arithmetic drives 22-unit rows in a 220-unit
//! viewport or 1-line rows in a terminal panel.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──> Unmounted ──mount(h)──> Mounted ──unmount()──> Unmounted
//!                                    │   ▲
//!                                    └───┘ on_scroll(y) / set_scroll_offset(y)
//! ```
//!
//! `screen_items_len` is computed on mount only; a host that changes the
//! viewport height mounts again.

use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::error::CoreError;

/// How many viewports' worth of rows each repaint materializes.
pub const CHUNK_SCREENS: f64 = 2.5;

/// Horizontal or vertical size of the list container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extent {
    /// A fixed size in layout units.
    Fixed(u16),
    /// Fill the containing area.
    #[default]
    Fill,
}

impl From<Option<u16>> for Extent {
    fn from(value: Option<u16>) -> Self {
        value.map_or(Extent::Fill, Extent::Fixed)
    }
}

/// Construction parameters for a [`VirtualList`].
#[derive(Debug, Clone)]
pub struct VirtualListConfig<T> {
    /// Fixed width, or `None` to fill the container.
    pub width: Option<u16>,
    /// Fixed height, or `None` to fill the container.
    pub height: Option<u16>,
    /// Height of every row. Must be non-zero.
    pub item_height: u32,
    /// The full ordered row sequence, shared with its owner.
    pub items: Arc<[T]>,
    /// Row count used for the scroll extent; defaults to `items.len()`.
    pub total_rows: Option<usize>,
}

impl<T> VirtualListConfig<T> {
    /// Fill-container configuration over `items`.
    pub fn new(items: Arc<[T]>, item_height: u32) -> Self {
        Self { width: None, height: None, item_height, items, total_rows: None }
    }
}

/// Viewport-derived state, present only while mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewportWindow {
    /// Height of the viewport the list was mounted into.
    viewport_height: u64,
    /// Rows that fit in one viewport, rounded up.
    screen_items_len: u64,
    /// Scroll offset at the last repaint; `None` until the first scroll.
    last_repaint_y: Option<u64>,
    /// Distance the viewport may travel before a repaint is due.
    max_buffer: u64,
}

/// A materialized row: its index in the item sequence and absolute top offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub top: u64,
}

/// The list's materialized content: the scroller followed by one chunk of
/// absolutely positioned rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountedChunk {
    /// Extent of the invisible full-height spacer.
    pub scroller_height: u64,
    /// Positioned rows, ascending by index.
    pub placements: Vec<Placement>,
}

impl MountedChunk {
    /// Index range covered by this chunk (empty when nothing is placed).
    pub fn range(&self) -> Range<usize> {
        match (self.placements.first(), self.placements.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// See the module documentation.
#[derive(Debug, Clone)]
pub struct VirtualList<T> {
    width: Extent,
    height: Extent,
    item_height: u32,
    items: Arc<[T]>,
    total_rows: usize,
    scroll_offset: u64,
    window: Option<ViewportWindow>,
    mounted: MountedChunk,
    repaint_count: u64,
}

impl<T> VirtualList<T> {
    /// Builds an unmounted list whose content is just the scroller.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidItemHeight`] when `item_height` is zero.
    pub fn new(config: VirtualListConfig<T>) -> Result<Self, CoreError> {
        if config.item_height == 0 {
            return Err(CoreError::InvalidItemHeight);
        }
        let total_rows = config.total_rows.unwrap_or(config.items.len());
        let scroller_height = u64::from(config.item_height) * total_rows as u64;
        Ok(Self {
            width: config.width.into(),
            height: config.height.into(),
            item_height: config.item_height,
            items: config.items,
            total_rows,
            scroll_offset: 0,
            window: None,
            mounted: MountedChunk { scroller_height, placements: Vec::new() },
            repaint_count: 0,
        })
    }

    /// Attaches the list to a viewport of `viewport_height` units and renders
    /// the initial chunk starting at row 0.
    ///
    /// Mounting an already mounted list recomputes the window for the new
    /// height and forgets the last repaint position.
    pub fn mount(&mut self, viewport_height: u64) {
        let item_height = u64::from(self.item_height);
        let screen_items_len = viewport_height.div_ceil(item_height);
        self.window = Some(ViewportWindow {
            viewport_height,
            screen_items_len,
            last_repaint_y: None,
            max_buffer: screen_items_len * item_height,
        });
        self.render_chunk(0, screen_items_len as f64 * CHUNK_SCREENS);
        debug!(
            viewport_height,
            screen_items_len,
            total_rows = self.total_rows,
            "virtual list mounted"
        );
    }

    /// Detaches from the viewport. Scroll events are ignored until the next
    /// [`mount`](Self::mount) and the mounted rows are released.
    pub fn unmount(&mut self) {
        self.window = None;
        self.mounted.placements = Vec::new();
    }

    /// Handles a scroll to `offset`. Returns `true` when a repaint happened.
    ///
    /// The first scroll after mounting always repaints. Later scrolls repaint
    /// only once the offset is more than `max_buffer` away from the offset of
    /// the last repaint.
    pub fn on_scroll(&mut self, offset: u64) -> bool {
        let Some(window) = self.window else {
            return false;
        };
        self.scroll_offset = offset;

        let travelled = offset as f64 / f64::from(self.item_height);
        let first = round_half_up(travelled - window.screen_items_len as f64).max(0.0) as usize;

        let due = match window.last_repaint_y {
            None => true,
            Some(last) => offset.abs_diff(last) > window.max_buffer,
        };
        if !due {
            return false;
        }

        self.render_chunk(first, window.screen_items_len as f64 * CHUNK_SCREENS);
        if let Some(window) = self.window.as_mut() {
            window.last_repaint_y = Some(offset);
        }
        true
    }

    /// Moves the scroll position, clamped to the scrollable range, and then
    /// delivers the scroll as [`on_scroll`](Self::on_scroll) would receive it.
    ///
    /// Returns `true` when a repaint happened. While unmounted the offset is
    /// clamped to the scroller and stored without repainting.
    pub fn set_scroll_offset(&mut self, offset: u64) -> bool {
        let viewport = self.window.map_or(0, |w| w.viewport_height);
        let max = self.mounted.scroller_height.saturating_sub(viewport);
        let offset = offset.min(max);
        if self.window.is_none() {
            self.scroll_offset = offset;
            return false;
        }
        self.on_scroll(offset)
    }

    /// Scrolls by `rows` whole rows (negative scrolls up).
    pub fn scroll_rows(&mut self, rows: i64) -> bool {
        let delta = rows.unsigned_abs().saturating_mul(u64::from(self.item_height));
        let target = if rows < 0 {
            self.scroll_offset.saturating_sub(delta)
        } else {
            self.scroll_offset.saturating_add(delta)
        };
        self.set_scroll_offset(target)
    }

    /// Materializes rows `[from, round(from + count))`, clamped to the total
    /// row count, replacing the previously mounted chunk entirely.
    fn render_chunk(&mut self, from: usize, count: f64) {
        let end = round_half_up(from as f64 + count).max(0.0) as usize;
        let to = end.min(self.total_rows).min(self.items.len());
        let item_height = u64::from(self.item_height);

        let placements = (from..to.max(from))
            .map(|index| Placement { index, top: index as u64 * item_height })
            .collect();

        self.mounted = MountedChunk { scroller_height: self.mounted.scroller_height, placements };
        self.repaint_count += 1;
        debug!(from, to, "virtual list repaint");
    }

    /// The current materialized content.
    pub fn mounted(&self) -> &MountedChunk {
        &self.mounted
    }

    /// Mounted rows that intersect the viewport, with their items.
    pub fn visible(&self) -> impl Iterator<Item = (Placement, &T)> + '_ {
        let viewport = self.window.map_or(0, |w| w.viewport_height);
        let top = self.scroll_offset;
        let bottom = top.saturating_add(viewport);
        let item_height = u64::from(self.item_height);
        self.mounted
            .placements
            .iter()
            .filter(move |p| p.top + item_height > top && p.top < bottom)
            .filter_map(|p| self.items.get(p.index).map(|item| (*p, item)))
    }

    /// The full item sequence, in display order.
    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn scroller_height(&self) -> u64 {
        self.mounted.scroller_height
    }

    pub fn is_mounted(&self) -> bool {
        self.window.is_some()
    }

    pub fn screen_items_len(&self) -> u64 {
        self.window.map_or(0, |w| w.screen_items_len)
    }

    pub fn max_buffer(&self) -> u64 {
        self.window.map_or(0, |w| w.max_buffer)
    }

    pub fn last_repaint_y(&self) -> Option<u64> {
        self.window.and_then(|w| w.last_repaint_y)
    }

    /// Number of chunk renders since construction, the mount included.
    pub fn repaint_count(&self) -> u64 {
        self.repaint_count
    }

    pub fn width(&self) -> Extent {
        self.width
    }

    pub fn height(&self) -> Extent {
        self.height
    }
}

/// Rounds halves toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
fn round_half_up(value: f64) -> f64 {
    // `value + 0.5` is inexact just below a half, so start from `round`
    // (halves away from zero) and only move negative halves up.
    let r = value.round();
    if value - r == 0.5 {
        r + 1.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(rows: usize, item_height: u32) -> VirtualList<usize> {
        let items: Arc<[usize]> = (0..rows).collect();
        VirtualList::new(VirtualListConfig::new(items, item_height)).unwrap()
    }

    #[test]
    fn zero_item_height_is_rejected() {
        let items: Arc<[usize]> = Arc::from(vec![1, 2, 3]);
        let err = VirtualList::new(VirtualListConfig::new(items, 0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidItemHeight));
    }

    #[test]
    fn unmounted_list_holds_only_the_scroller() {
        let l = list(40, 22);
        assert!(!l.is_mounted());
        assert_eq!(l.scroller_height(), 880);
        assert!(l.mounted().is_empty());
        assert_eq!(l.width(), Extent::Fill);
    }

    #[test]
    fn total_rows_override_sets_extent() {
        let items: Arc<[usize]> = (0..10).collect();
        let mut config = VirtualListConfig::new(items, 5);
        config.total_rows = Some(4);
        config.height = Some(30);
        let mut l = VirtualList::new(config).unwrap();
        assert_eq!(l.scroller_height(), 20);
        assert_eq!(l.height(), Extent::Fixed(30));
        l.mount(100);
        assert_eq!(l.mounted().range(), 0..4);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.4), 0.0);
        assert_eq!(round_half_up(45.5), 46.0);
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
    }

    #[test]
    fn odd_screen_counts_round_the_chunk_end() {
        let mut l = list(100, 10);
        l.mount(30);
        // 3 rows per screen -> 7.5 rows per chunk -> 8
        assert_eq!(l.mounted().range(), 0..8);
    }

    #[test]
    fn scroll_while_unmounted_is_ignored() {
        let mut l = list(100, 22);
        assert!(!l.on_scroll(500));
        l.mount(220);
        l.unmount();
        assert!(!l.on_scroll(500));
        assert!(l.mounted().is_empty());
    }

    #[test]
    fn remount_recomputes_window_and_forgets_last_repaint() {
        let mut l = list(1_000, 22);
        l.mount(220);
        l.on_scroll(3_000);
        assert_eq!(l.last_repaint_y(), Some(3_000));
        l.mount(440);
        assert_eq!(l.screen_items_len(), 20);
        assert_eq!(l.max_buffer(), 440);
        assert_eq!(l.last_repaint_y(), None);
        assert_eq!(l.mounted().range(), 0..50);
    }

    #[test]
    fn set_scroll_offset_clamps_to_scrollable_range() {
        let mut l = list(20, 22);
        l.mount(220);
        assert!(l.set_scroll_offset(10_000));
        assert_eq!(l.scroll_offset(), 440 - 220);
        assert!(!l.scroll_rows(-1));
        assert_eq!(l.scroll_offset(), 198);
        l.scroll_rows(-100);
        assert_eq!(l.scroll_offset(), 0);
    }

    #[test]
    fn visible_rows_are_those_inside_the_viewport() {
        let mut l = list(1_000, 22);
        l.mount(220);
        l.on_scroll(3_000);
        let visible: Vec<usize> = l.visible().map(|(p, item)| {
            assert_eq!(p.index, *item);
            p.index
        }).collect();
        // 3000 / 22 = 136.36 -> rows 136..=146 intersect [3000, 3220)
        assert_eq!(visible.first(), Some(&136));
        assert_eq!(visible.last(), Some(&146));
    }
}
