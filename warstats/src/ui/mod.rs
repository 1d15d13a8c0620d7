//! Frame rendering. [`render`] is the single entry point, called from the
//! event loop's `terminal.draw()` closure.
//!
//! Layout arithmetic lives in `layout.rs`, rosters in `roster_view.rs`,
//! modal overlays in `overlays.rs` and `help.rs`.

mod header;
mod layout;
pub mod help;
pub mod keybindings;
pub mod overlays;
pub mod roster_view;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use warstats_core::types::Faction;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// The roster viewport height is pushed into the display before anything is
/// drawn, so a resize remounts the lists in the same frame.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [header_area, warden, colonial, status_bar] = compute_layout(frame, state.focus);
    state.panel_rects = [warden, colonial];

    let viewport = inner_rect(if warden.width > 0 { warden } else { colonial }).height;
    state.display.borrow_mut().set_viewport_height(u64::from(viewport));

    let display = state.display.borrow();
    header::render_header(frame, header_area, &display, theme);

    if display.base_page_visible() {
        render_base_page(frame, warden.union(colonial), theme);
    } else {
        let focused = state.focused_faction();
        for (faction, area) in [(Faction::Warden, warden), (Faction::Colonial, colonial)] {
            roster_view::render_roster(frame, area, faction, faction == focused, &display, theme);
        }
    }

    render_status_bar(frame, status_bar, state, &display, theme);

    match state.mode {
        Mode::Selector => overlays::render_selector(frame, &state.selector.borrow(), theme),
        Mode::Search => {
            let faction = state.focused_faction();
            let area = if faction == Faction::Warden { warden } else { colonial };
            overlays::render_search_box(
                frame,
                area,
                &state.search(faction).borrow(),
                display.list(faction),
                theme,
            );
        }
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::Normal => {}
    }
}

/// Shown while no war is selected.
fn render_base_page(frame: &mut Frame, area: Rect, theme: &Theme) {
    let inner = inner_rect(area);
    let top = inner.y + inner.height / 3;
    let text = vec![
        Line::from("Foxhole war statistics"),
        Line::from(""),
        Line::styled("w  pick a war    n / p  step through wars    ?  help", Style::default().fg(theme.muted)),
    ];
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        Rect { y: top, height: inner.bottom().saturating_sub(top), ..inner },
    );
}
