//! Header panel: which war is on screen, who won, when it ran and where the
//! record came from.

use chrono::{DateTime, Local, TimeZone};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::controller::WarDisplay;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

const SHORT_FORMAT: &str = "%Y-%m-%d";
const LONG_FORMAT: &str = "%A, %B %-d, %Y %H:%M";

/// Formats epoch milliseconds in local time, or `?` when out of range.
pub fn format_timestamp(ms: i64, format: &str) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|utc| format_in(&utc.with_timezone(&Local), format))
        .unwrap_or_else(|| "?".to_owned())
}

fn format_in<Tz: TimeZone>(at: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(format).to_string()
}

pub fn render_header(frame: &mut Frame, area: Rect, display: &WarDisplay, theme: &Theme) {
    let block = panel_block(Line::from(" warstats "), false, theme);

    let lines = match display.header() {
        Some(header) => {
            let winner = header.winner;
            vec![
                Line::from(vec![
                    Span::styled(
                        format!("War {}", header.war),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("   winner: "),
                    Span::styled(
                        winner.label(),
                        Style::default().fg(theme.faction(winner)).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("   source: {}", header.source), Style::default().fg(theme.muted)),
                ]),
                Line::from(vec![
                    Span::raw(format!(
                        "{} → {}",
                        format_timestamp(header.start, SHORT_FORMAT),
                        format_timestamp(header.end, SHORT_FORMAT)
                    )),
                    Span::styled(
                        format!(
                            "   {} to {}",
                            format_timestamp(header.start, LONG_FORMAT),
                            format_timestamp(header.end, LONG_FORMAT)
                        ),
                        Style::default().fg(theme.muted),
                    ),
                ]),
            ]
        }
        None if display.is_loading() => vec![Line::from(format!("Loading {}…", display.selection()))],
        None => vec![Line::from(Span::styled(
            "No war selected",
            Style::default().fg(theme.muted),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn formats_in_the_given_zone() {
        let at = Utc.timestamp_millis_opt(1_600_000_000_000).single().unwrap();
        assert_eq!(format_in(&at, SHORT_FORMAT), "2020-09-13");
        assert_eq!(format_in(&at, LONG_FORMAT), "Sunday, September 13, 2020 12:26");
    }

    #[test]
    fn out_of_range_timestamp_is_a_question_mark() {
        assert_eq!(format_timestamp(i64::MAX, SHORT_FORMAT), "?");
    }
}
