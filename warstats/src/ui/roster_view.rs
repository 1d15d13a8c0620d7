//! Roster panel renderer.
//!
//! Draws only the rows the panel's [`VirtualList`] has mounted and that
//! intersect the viewport, each at its absolute offset minus the scroll
//! offset. The scrollbar is sized by the full scroller extent, so it reflects
//! the whole roster even though only a chunk is materialized.

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use warstats_core::roster::{PlayerRow, Rank};
use warstats_core::types::Faction;
use warstats_core::virtual_list::VirtualList;

use crate::controller::WarDisplay;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the roster of `faction` into `area` (borders included).
pub fn render_roster(
    frame: &mut Frame,
    area: Rect,
    faction: Faction,
    is_focused: bool,
    display: &WarDisplay,
    theme: &Theme,
) {
    if area.width == 0 {
        return;
    }
    let list = display.list(faction);

    let mut title = vec![Span::styled(
        format!(" {} ", faction.label()),
        Style::default().fg(theme.faction(faction)).add_modifier(Modifier::BOLD),
    )];
    if let Some(list) = list {
        title.push(Span::styled(format!("({}) ", list.total_rows()), Style::default().fg(theme.muted)));
    }
    let mut block = panel_block(Line::from(title), is_focused, theme);
    if let Some(list) = list.filter(|l| !l.mounted().is_empty()) {
        let range = list.mounted().range();
        block = block.title_bottom(Line::styled(
            format!(" rows {}–{} ", range.start + 1, range.end),
            Style::default().fg(theme.muted),
        ));
    }

    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let Some(list) = list else {
        let msg = if display.is_loading() { "Loading…" } else { "" };
        frame.render_widget(Paragraph::new(msg), inner);
        return;
    };

    if list.total_rows() == 0 {
        frame.render_widget(
            Paragraph::new(Span::styled("No players", Style::default().fg(theme.muted))),
            inner,
        );
        return;
    }

    render_rows(frame, inner, list, theme);
    render_scrollbar(frame, area, list, u64::from(inner.height));
}

fn render_rows(frame: &mut Frame, inner: Rect, list: &VirtualList<PlayerRow>, theme: &Theme) {
    let scroll = list.scroll_offset();
    let row_height = u16::try_from(list.item_height()).unwrap_or(u16::MAX);
    let rank_width = list.total_rows().to_string().len();

    for (placement, row) in list.visible() {
        // Rows cut off at the top edge are left blank.
        let Some(rel) = placement.top.checked_sub(scroll) else { continue };
        let Ok(rel) = u16::try_from(rel) else { continue };
        if rel >= inner.height {
            continue;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + rel,
            width: inner.width,
            height: row_height.min(inner.height - rel),
        };
        frame.render_widget(Paragraph::new(player_line(row, rank_width, theme)), row_area);
    }
}

/// Rank badge, commendations, name and steam id on one line.
fn player_line<'a>(row: &'a PlayerRow, rank_width: usize, theme: &Theme) -> Line<'a> {
    let rank_style = match row.rank {
        Rank::Ranked(_) => Style::default().fg(theme.rank_ranked).add_modifier(Modifier::BOLD),
        Rank::Tied => Style::default().fg(theme.rank_tied),
    };
    Line::from(vec![
        Span::styled(format!("{:>rank_width$} ", row.rank.to_string()), rank_style),
        Span::styled(format!("{:>7} ", row.commends), Style::default().fg(theme.commends)),
        Span::styled(row.username.as_str(), Style::default().fg(theme.username)),
        Span::styled(format!("  {}", row.steam_id), Style::default().fg(theme.muted)),
    ])
}

fn render_scrollbar(frame: &mut Frame, area: Rect, list: &VirtualList<PlayerRow>, viewport: u64) {
    let scrollable = list.scroller_height().saturating_sub(viewport);
    if scrollable == 0 {
        return;
    }
    let mut state = ScrollbarState::new(usize::try_from(scrollable + 1).unwrap_or(usize::MAX))
        .position(usize::try_from(list.scroll_offset()).unwrap_or(usize::MAX))
        .viewport_content_length(usize::try_from(viewport).unwrap_or(usize::MAX));
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin { vertical: 1, horizontal: 0 }),
        &mut state,
    );
}
