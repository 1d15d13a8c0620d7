//! Keybinding dispatcher.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a [`KeyAction`] telling the event loop whether to continue or
//! quit. Dispatch branches first on `state.mode`, so each mode has its own
//! handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Rows the mouse wheel scrolls per notch.
const WHEEL_ROWS: i64 = 3;

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler for the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::Normal => handle_normal(key, state),
        Mode::Selector => handle_selector(key, state),
        Mode::Search => handle_search(key, state),
        Mode::HelpOverlay => handle_help(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('L') | KeyCode::Char('l') => {
            state.focus = state.focus.next();
        }
        KeyCode::Char('H') | KeyCode::Char('h') => state.focus = state.focus.prev(),

        KeyCode::Char('n') => state.next_war(),
        KeyCode::Char('p') => state.prev_war(),
        KeyCode::Char('w') => state.open_selector(),

        KeyCode::Char('/') if state.display.borrow().list(state.focused_faction()).is_some() => {
            state.open_search();
        }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// j / k / g / G, arrows, paging keys and Ctrl combos on the focused roster.
///
/// Returns `None` when the key is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_rows(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_rows(-1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Selector mode
// ---------------------------------------------------------------------------

fn handle_selector(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => state.confirm_selector(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('w') => state.mode = Mode::Normal,
        code => {
            let mut selector = state.selector.borrow_mut();
            match code {
                KeyCode::Char('j') | KeyCode::Down => selector.cursor_next(),
                KeyCode::Char('k') | KeyCode::Up => selector.cursor_prev(),
                KeyCode::Char('g') | KeyCode::Home => selector.cursor_first(),
                KeyCode::Char('G') | KeyCode::End => selector.cursor_last(),
                _ => {}
            }
        }
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Search mode
// ---------------------------------------------------------------------------

fn handle_search(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let search = std::rc::Rc::clone(state.search(state.focused_faction()));

    match key.code {
        KeyCode::Esc => state.close_search(),
        KeyCode::Enter => state.choose_search_hit(),
        KeyCode::Backspace => state.search_backspace(),
        KeyCode::Down | KeyCode::Tab => search.borrow_mut().select_next(),
        KeyCode::Up | KeyCode::BackTab => search.borrow_mut().select_prev(),
        KeyCode::Char('n') if ctrl => search.borrow_mut().select_next(),
        KeyCode::Char('p') if ctrl => search.borrow_mut().select_prev(),
        KeyCode::Char(c) if !ctrl => state.search_input(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the roster under the pointer; the wheel scrolls the
/// roster under the pointer (or the help overlay while it is open).
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    let pos = Position { x: mouse.column, y: mouse.row };
    let rows = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.mode == Mode::Normal {
                if let Some(focus) = panel_at(pos, state) {
                    state.focus = focus;
                }
            }
            return KeyAction::Continue;
        }
        MouseEventKind::ScrollUp => -WHEEL_ROWS,
        MouseEventKind::ScrollDown => WHEEL_ROWS,
        _ => return KeyAction::Continue,
    };

    match state.mode {
        Mode::HelpOverlay => {
            let step = WHEEL_ROWS as u16;
            state.help_scroll = if rows < 0 {
                state.help_scroll.saturating_sub(step)
            } else {
                state.help_scroll.saturating_add(step)
            };
        }
        Mode::Normal => {
            if let Some(focus) = panel_at(pos, state) {
                state.scroll_faction(focus.faction(), rows);
            }
        }
        Mode::Selector | Mode::Search => {}
    }
    KeyAction::Continue
}

/// The roster panel containing `pos`, skipping collapsed panels.
fn panel_at(pos: Position, state: &AppState) -> Option<PanelFocus> {
    let [warden, colonial] = state.panel_rects;
    if warden.width > 0 && warden.contains(pos) {
        Some(PanelFocus::Warden)
    } else if colonial.width > 0 && colonial.contains(pos) {
        Some(PanelFocus::Colonial)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use warstats_core::selection::WarId;
    use warstats_core::types::Faction;

    use super::*;
    use crate::controller::tests::war_entry;
    use crate::loader::{LoadOutcome, LoadRequest};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(state: &mut AppState, keys: &str) {
        for c in keys.chars() {
            handle_key(key(KeyCode::Char(c)), state);
        }
    }

    /// State with war 1 on screen: `players` per faction, 10-row panels.
    fn loaded(players: usize) -> (AppState, crossbeam_channel::Receiver<LoadRequest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = AppState::new(tx, 1).unwrap();
        state.display.borrow_mut().set_viewport_height(10);
        state.select_war(1);
        let war = WarId::new(1).unwrap();
        state.apply_load(LoadOutcome { war, result: Ok(war_entry(players, players)) });
        rx.try_recv().unwrap();
        (state, rx)
    }

    fn offset(state: &AppState, faction: Faction) -> u64 {
        state.display.borrow().list(faction).unwrap().scroll_offset()
    }

    #[test]
    fn vim_keys_scroll_the_focused_roster() {
        let (mut state, _rx) = loaded(200);
        press(&mut state, "jjj");
        assert_eq!(offset(&state, Faction::Warden), 3);
        handle_key(ctrl('d'), &mut state);
        assert_eq!(offset(&state, Faction::Warden), 8);
        handle_key(ctrl('f'), &mut state);
        assert_eq!(offset(&state, Faction::Warden), 18);
        press(&mut state, "G");
        assert_eq!(offset(&state, Faction::Warden), 190);
        press(&mut state, "g");
        assert_eq!(offset(&state, Faction::Warden), 0);
        press(&mut state, "k");
        assert_eq!(offset(&state, Faction::Warden), 0);

        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.focus, PanelFocus::Colonial);
        press(&mut state, "jj");
        assert_eq!(offset(&state, Faction::Colonial), 2);
        assert_eq!(offset(&state, Faction::Warden), 0);
    }

    #[test]
    fn n_and_p_step_through_wars() {
        let (mut state, rx) = loaded(5);
        press(&mut state, "n");
        assert_eq!(rx.try_recv().unwrap().war.get(), 2);
        press(&mut state, "pp");
        assert_eq!(state.selector.borrow().value(), warstats_core::selection::WarSelection::None);
        assert!(state.display.borrow().base_page_visible());
        assert_eq!(state.location(), "");
    }

    #[test]
    fn selector_picks_the_highlighted_war() {
        let (mut state, rx) = loaded(5);
        press(&mut state, "w");
        assert_eq!(state.mode, Mode::Selector);
        press(&mut state, "jjj");
        handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(rx.try_recv().unwrap().war.get(), 4);
        assert_eq!(state.location(), "war=4");

        press(&mut state, "w");
        handle_key(key(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn search_jumps_to_the_chosen_player() {
        let (mut state, _rx) = loaded(300);
        press(&mut state, "/");
        assert_eq!(state.mode, Mode::Search);
        // Letters bound in normal mode ("n", "w") go into the box.
        press(&mut state, "warden25");
        assert_eq!(state.search(Faction::Warden).borrow().hits().len(), 10);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Enter), &mut state);

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(offset(&state, Faction::Warden), 250);
        assert_eq!(state.search(Faction::Warden).borrow().query(), "");
    }

    #[test]
    fn escape_leaves_search_keeping_the_query() {
        let (mut state, _rx) = loaded(30);
        press(&mut state, "/war");
        handle_key(key(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        let search = state.search(Faction::Warden).borrow();
        assert_eq!(search.query(), "war");
        assert!(search.hits().is_empty());
    }

    #[test]
    fn search_needs_a_roster() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut state = AppState::new(tx, 1).unwrap();
        press(&mut state, "/");
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn help_opens_scrolls_and_closes() {
        let (mut state, _rx) = loaded(5);
        press(&mut state, "?jj");
        assert_eq!(state.mode, Mode::HelpOverlay);
        assert_eq!(state.help_scroll, 2);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn wheel_scrolls_the_roster_under_the_pointer() {
        let (mut state, _rx) = loaded(100);
        state.panel_rects = [Rect::new(0, 4, 40, 12), Rect::new(39, 4, 41, 12)];
        let wheel = |kind, column| MouseEvent {
            kind,
            column,
            row: 8,
            modifiers: KeyModifiers::NONE,
        };

        handle_mouse(wheel(MouseEventKind::ScrollDown, 60), &mut state);
        assert_eq!(offset(&state, Faction::Colonial), 3);
        assert_eq!(state.focus, PanelFocus::Warden);

        handle_mouse(wheel(MouseEventKind::Down(MouseButton::Left), 60), &mut state);
        assert_eq!(state.focus, PanelFocus::Colonial);
    }
}
