//! Help overlay: a centred modal drawn over the rosters after a `Clear`.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the key reference, scrolled by `help_scroll` rows. Skipped on
/// terminals narrower than 50 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to close ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Rosters"),
        Line::from("  j / k         Scroll down / up one player"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  Tab / H / L   Switch between Wardens and Colonials"),
        Line::from("  mouse wheel   Scroll the roster under the pointer"),
        Line::from(""),
        Line::from("Wars"),
        Line::from("  w             Open the war selector (Enter picks, Esc closes)"),
        Line::from("  n / p         Next / previous war"),
        Line::from(""),
        Line::from("Search"),
        Line::from("  /             Search the focused roster by name or steam id"),
        Line::from("  Up / Down     Move between hits"),
        Line::from("  Enter         Jump to the highlighted player"),
        Line::from("  Esc           Leave the search box"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Esc       Quit"),
    ])
}
