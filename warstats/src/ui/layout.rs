//! Screen layout: header, two roster panels side by side, status bar.
//!
//! Pure layout arithmetic, recomputed every frame so it follows the terminal
//! size. `Spacing::Overlap(1)` with `MergeStrategy::Fuzzy` lets the two roster
//! panels share their middle border column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::controller::WarDisplay;
use crate::theme::Theme;

/// Terminal width below which only the focused roster is shown.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 80;

/// Header height including its border.
const HEADER_HEIGHT: u16 = 4;

/// Returns `[header, warden, colonial, status_bar]` for the current frame.
///
/// Below [`SIDE_BY_SIDE_MIN_WIDTH`] columns the unfocused roster collapses to
/// zero width.
pub fn compute_layout(frame: &Frame, focus: PanelFocus) -> [Rect; 4] {
    let area = frame.area();
    let [header, main_area, status_bar] = area.layout(&Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let constraints = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        [Constraint::Percentage(50), Constraint::Percentage(50)]
    } else if focus == PanelFocus::Warden {
        [Constraint::Fill(1), Constraint::Length(0)]
    } else {
        [Constraint::Length(0), Constraint::Fill(1)]
    };
    let horizontal = Layout::horizontal(constraints).spacing(Spacing::Overlap(1));

    let [warden, colonial] = main_area.layout(&horizontal);
    [header, warden, colonial, status_bar]
}

/// A panel's content area inside its 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block for a panel: thick and accented when focused, plain
/// otherwise. `Fuzzy` merging is needed when thick and plain borders meet.
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// One-row status bar: mode badge, then the latest status message or error,
/// then the current location.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    display: &WarDisplay,
    theme: &Theme,
) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
        Mode::Search => (" SEARCH ", theme.status_mode_input),
        Mode::Selector => (" SELECT ", theme.status_mode_input),
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    if let Some(error) = display.last_error() {
        spans.push(Span::styled(format!(" {error}"), Style::default().fg(theme.error)));
    } else if display.is_loading() {
        spans.push(Span::raw(format!(" loading {}…", display.selection())));
    } else if let Some(message) = state.status.borrow().message() {
        spans.push(Span::raw(format!(" {message}")));
    }

    if !state.location().is_empty() {
        spans.push(Span::styled(
            format!("  ?{}", state.location()),
            Style::default().fg(theme.muted),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
