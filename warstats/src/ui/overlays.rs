//! Modal overlays drawn above the rosters: the war selector and the search
//! box. Both erase their area with `Clear` first.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph},
};
use warstats_core::roster::PlayerRow;
use warstats_core::search::MAX_RESULTS;
use warstats_core::virtual_list::VirtualList;

use crate::search_box::PlayerSearch;
use crate::selector::WarSelector;
use crate::theme::Theme;

/// Centered list of "No war selected" and wars 1-64, cursor highlighted and
/// the current value marked.
pub fn render_selector(frame: &mut Frame, selector: &WarSelector, theme: &Theme) {
    let area = frame.area().centered(Constraint::Length(28), Constraint::Percentage(70));
    if area.height < 3 {
        return;
    }
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = WarSelector::options()
        .map(|option| {
            let marker = if option == selector.value() { "● " } else { "  " };
            ListItem::new(format!("{marker}{option}"))
        })
        .collect();

    let cursor = usize::try_from(selector.cursor().raw()).ok();
    let mut state = ListState::default().with_selected(cursor);
    let list = List::new(items)
        .block(
            Block::bordered()
                .title(" Select war ")
                .border_style(Style::default().fg(theme.border_active)),
        )
        .highlight_style(Style::default().bg(theme.highlight_bg).fg(theme.highlight_fg));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Search box docked to the top of the roster panel `panel`: the query on
/// the first line, then up to [`MAX_RESULTS`] hits.
pub fn render_search_box(
    frame: &mut Frame,
    panel: Rect,
    search: &PlayerSearch,
    list: Option<&VirtualList<PlayerRow>>,
    theme: &Theme,
) {
    let hits = search.hits();
    let wanted = 3 + u16::try_from(hits.len().min(MAX_RESULTS)).unwrap_or(0);
    let area = Rect { height: wanted.min(panel.height), ..panel };
    if area.height < 3 || area.width < 10 {
        return;
    }
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("/ ", Style::default().fg(theme.status_mode_input)),
        Span::raw(search.query()),
        Span::styled("█", Style::default().fg(theme.muted)),
    ])];
    for (i, hit) in hits.iter().enumerate() {
        let Some(row) = list.and_then(|l| l.items().get(hit.index)) else { continue };
        let style = if i == search.selected() {
            Style::default().bg(theme.highlight_bg).fg(theme.highlight_fg)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(row.username.clone(), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("  #{}  {}", hit.index + 1, row.profile_url()), style.fg(theme.muted)),
        ]));
    }

    let block = Block::bordered()
        .title(format!(" Find {} ", search.faction().label().to_lowercase()))
        .border_style(Style::default().fg(theme.border_active));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
