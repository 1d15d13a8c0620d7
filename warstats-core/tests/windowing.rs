//! Windowing properties of the virtual list.

use std::sync::Arc;

use warstats_core::virtual_list::{VirtualList, VirtualListConfig};

fn list(rows: usize, item_height: u32, viewport: u64) -> VirtualList<usize> {
    let items: Arc<[usize]> = (0..rows).collect();
    let mut list = VirtualList::new(VirtualListConfig::new(items, item_height)).unwrap();
    list.mount(viewport);
    list
}

fn range(list: &VirtualList<usize>) -> std::ops::Range<usize> {
    list.mounted().range()
}

#[test]
fn end_to_end_scroll_scenario() {
    let mut l = list(1_000, 22, 220);
    assert_eq!(l.screen_items_len(), 10);
    assert_eq!(l.max_buffer(), 220);
    assert_eq!(range(&l), 0..25);
    assert_eq!(l.last_repaint_y(), None);

    assert!(l.on_scroll(3_000), "first scroll always repaints");
    assert_eq!(range(&l), 126..151);
    assert_eq!(l.last_repaint_y(), Some(3_000));
}

#[test]
fn initial_chunk_is_bounded_by_total_rows() {
    for (rows, expected) in [(0, 0..0), (7, 0..7), (25, 0..25), (5_000, 0..25)] {
        let l = list(rows, 22, 220);
        assert_eq!(range(&l), expected, "rows = {rows}");
        assert_eq!(l.scroller_height(), rows as u64 * 22);
    }
}

#[test]
fn empty_list_mounts_only_the_scroller() {
    let mut l = list(0, 22, 220);
    assert!(l.mounted().is_empty());
    assert_eq!(l.scroller_height(), 0);
    assert!(l.on_scroll(0));
    assert!(l.mounted().is_empty());
}

#[test]
fn repaint_is_throttled_by_max_buffer() {
    let mut l = list(1_000, 22, 220);
    assert!(l.on_scroll(1_000));
    let after_first = l.repaint_count();
    let chunk = l.mounted().clone();

    // Anywhere within one viewport of the last repaint: no re-render.
    for y in [1_000, 1_100, 1_220, 780, 900] {
        assert!(!l.on_scroll(y), "y = {y}");
    }
    assert_eq!(l.repaint_count(), after_first);
    assert_eq!(l.mounted(), &chunk);

    // Crossing the threshold: exactly one re-render at the new offset.
    assert!(l.on_scroll(1_221));
    assert_eq!(l.repaint_count(), after_first + 1);
    let first = ((1_221.0_f64 / 22.0 - 10.0) + 0.5).floor() as usize;
    assert_eq!(range(&l).start, first);
    assert_eq!(l.last_repaint_y(), Some(1_221));

    // Scrolling back up past the buffer repaints again, clamped at row 0.
    assert!(l.on_scroll(0));
    assert_eq!(range(&l), 0..25);
}

#[test]
fn placements_are_absolutely_positioned() {
    let mut l = list(400, 17, 100);
    for y in [0, 350, 2_000, 6_500] {
        l.on_scroll(y);
        let chunk = l.mounted();
        let from = chunk.range().start;
        for (i, p) in chunk.placements.iter().enumerate() {
            assert_eq!(p.index, from + i);
            assert_eq!(p.top, (from + i) as u64 * 17);
        }
    }
}

#[test]
fn chunk_end_is_clamped_near_the_bottom() {
    let mut l = list(130, 22, 220);
    assert!(l.on_scroll(130 * 22 - 220));
    // first = round(2640 / 22 - 10) = 110; 110 + 25 clamps to 130
    assert_eq!(range(&l), 110..130);
}

#[test]
fn tall_viewport_clamps_initial_chunk() {
    let l = list(12, 22, 2_200);
    assert_eq!(l.screen_items_len(), 100);
    assert_eq!(range(&l), 0..12);
}
