//! Central application state.
//!
//! `AppState` owns the mode, the focused roster panel and the UI components.
//! Components that react to a war selection ([`WarSelector`], [`WarDisplay`],
//! the two [`PlayerSearch`] boxes and [`StatusLine`]) are shared through
//! `Rc<RefCell<_>>` and subscribed to the event bus when the state is built;
//! [`AppState::disconnect`] removes every subscription again. No rendering
//! lives here.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crossbeam_channel::Sender;
use ratatui::layout::Rect;
use tracing::{debug, info};
use warstats_core::bus::{listener, EventBus, SelectedWar, Subscription, WarEntryLoaded};
use warstats_core::selection::{query_with_selection, selection_from_query, WarSelection};
use warstats_core::types::{Faction, WarEntry};
use warstats_core::CoreError;

use crate::controller::WarDisplay;
use crate::loader::{LoadOutcome, LoadRequest};
use crate::search_box::PlayerSearch;
use crate::selector::WarSelector;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Roster navigation (default).
    #[default]
    Normal,
    /// War selector overlay is open.
    Selector,
    /// Typing into the focused roster's search box.
    Search,
    /// Help overlay is shown above all panels.
    HelpOverlay,
}

/// Which roster panel receives navigation keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Warden,
    Colonial,
}

impl PanelFocus {
    /// With two panels both directions land on the other one.
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Warden => PanelFocus::Colonial,
            PanelFocus::Colonial => PanelFocus::Warden,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }

    pub fn faction(self) -> Faction {
        match self {
            PanelFocus::Warden => Faction::Warden,
            PanelFocus::Colonial => Faction::Colonial,
        }
    }
}

/// Last notable thing that happened, shown in the status bar.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
}

impl StatusLine {
    /// Announces every war that reaches the screen.
    pub fn connect(status: &Rc<RefCell<Self>>, bus: &EventBus) -> Subscription {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(status);
        bus.attach::<WarEntryLoaded>(listener(move |entry: &Arc<WarEntry>| {
            if let Some(status) = weak.upgrade() {
                status.borrow_mut().message = Some(format!(
                    "war {}: {} wardens, {} colonials",
                    entry.war_id,
                    entry.warden.len(),
                    entry.colonial.len()
                ));
            }
        }))
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}

/// All mutable UI state, read by the renderer and mutated by the key and
/// mouse dispatchers.
pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,
    pub bus: Rc<EventBus>,
    pub selector: Rc<RefCell<WarSelector>>,
    pub display: Rc<RefCell<WarDisplay>>,
    pub status: Rc<RefCell<StatusLine>>,
    searches: [Rc<RefCell<PlayerSearch>>; 2],
    subscriptions: Vec<Subscription>,

    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,
    /// Outer rects of the warden and colonial panels from the last frame,
    /// used for mouse hit-testing.
    pub panel_rects: [Rect; 2],

    location: String,
    pending_location: Option<String>,
}

impl AppState {
    /// Builds the components and wires them to a fresh bus.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidItemHeight`] for a zero `item_height`.
    pub fn new(loader: Sender<LoadRequest>, item_height: u32) -> Result<Self, CoreError> {
        let bus = Rc::new(EventBus::new());
        let selector = Rc::new(RefCell::new(WarSelector::default()));
        let display = Rc::new(RefCell::new(WarDisplay::new(loader, item_height)?));
        let status = Rc::new(RefCell::new(StatusLine::default()));
        let searches = Faction::ALL.map(|f| Rc::new(RefCell::new(PlayerSearch::new(f))));

        let mut subscriptions = vec![
            WarSelector::connect(&selector, &bus),
            WarDisplay::connect(&display, &bus),
        ];
        subscriptions.extend(searches.iter().map(|s| PlayerSearch::connect(s, &bus)));
        subscriptions.push(StatusLine::connect(&status, &bus));

        Ok(Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            bus,
            selector,
            display,
            status,
            searches,
            subscriptions,
            help_scroll: 0,
            panel_rects: [Rect::default(); 2],
            location: String::new(),
            pending_location: None,
        })
    }

    /// Removes every bus subscription made in [`Self::new`].
    pub fn disconnect(&mut self) {
        for sub in self.subscriptions.drain(..) {
            debug!(event = sub.event_name(), "detaching listener");
            sub.detach(&self.bus);
        }
    }

    pub fn search(&self, faction: Faction) -> &Rc<RefCell<PlayerSearch>> {
        match faction {
            Faction::Warden => &self.searches[0],
            Faction::Colonial => &self.searches[1],
        }
    }

    pub fn focused_faction(&self) -> Faction {
        self.focus.faction()
    }

    /// Changes the selected war from a raw selector value (`0` for none).
    ///
    /// Publishes [`SelectedWar`] and records the new location for saving.
    /// Values outside `0..=64` are ignored; returns whether the value was
    /// accepted.
    pub fn select_war(&mut self, raw: i64) -> bool {
        let Some(selection) = WarSelection::from_raw(raw) else {
            debug!(raw, "ignoring out-of-range war selection");
            return false;
        };
        info!(%selection, "war selected");
        self.bus.publish::<SelectedWar>(&selection);
        self.location = query_with_selection(&self.location, selection);
        self.pending_location = Some(self.location.clone());
        true
    }

    /// Starts from a saved or supplied location. A war in it is selected
    /// without rewriting the location.
    pub fn restore_location(&mut self, query: &str) {
        self.location = query.strip_prefix('?').unwrap_or(query).to_owned();
        let selection = selection_from_query(&self.location);
        if selection != WarSelection::None {
            info!(%selection, "restoring war from location");
            self.bus.publish::<SelectedWar>(&selection);
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The location to persist, if it changed since the last call.
    pub fn take_pending_location(&mut self) -> Option<String> {
        self.pending_location.take()
    }

    /// Hands a finished load to the display and reports failures.
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        let mut display = self.display.borrow_mut();
        display.apply_load(outcome);
        if let Some(error) = display.last_error() {
            self.status.borrow_mut().set(error);
        }
    }

    /// Scrolls the focused roster by `rows` rows (negative scrolls up).
    pub fn scroll_rows(&mut self, rows: i64) {
        let faction = self.focused_faction();
        self.scroll_faction(faction, rows);
    }

    /// Scrolls the roster of `faction` by `rows` rows.
    pub fn scroll_faction(&mut self, faction: Faction, rows: i64) {
        if let Some(list) = self.display.borrow_mut().list_mut(faction) {
            list.scroll_rows(rows);
        }
    }

    pub fn scroll_top(&mut self) {
        if let Some(list) = self.display.borrow_mut().list_mut(self.focus.faction()) {
            list.set_scroll_offset(0);
        }
    }

    pub fn scroll_bottom(&mut self) {
        if let Some(list) = self.display.borrow_mut().list_mut(self.focus.faction()) {
            list.set_scroll_offset(u64::MAX);
        }
    }

    /// Rows that fit in a roster panel, at least one.
    pub fn page_rows(&self) -> i64 {
        let display = self.display.borrow();
        let rows = display.viewport_height() / u64::from(display.item_height());
        i64::try_from(rows).unwrap_or(i64::MAX).max(1)
    }

    pub fn half_page_down(&mut self) {
        let rows = (self.page_rows() / 2).max(1);
        self.scroll_rows(rows);
    }

    pub fn half_page_up(&mut self) {
        let rows = (self.page_rows() / 2).max(1);
        self.scroll_rows(-rows);
    }

    pub fn full_page_down(&mut self) {
        let rows = self.page_rows();
        self.scroll_rows(rows);
    }

    pub fn full_page_up(&mut self) {
        let rows = self.page_rows();
        self.scroll_rows(-rows);
    }

    /// Enters search mode on the focused roster, re-running any query left
    /// in the box.
    pub fn open_search(&mut self) {
        let faction = self.focused_faction();
        let display = self.display.borrow();
        self.search(faction).borrow_mut().refresh(display.list(faction));
        self.mode = Mode::Search;
    }

    /// Leaves search mode without choosing a hit.
    pub fn close_search(&mut self) {
        self.search(self.focused_faction()).borrow_mut().blur();
        self.mode = Mode::Normal;
    }

    /// Jumps the focused roster to the highlighted search hit.
    pub fn choose_search_hit(&mut self) {
        let faction = self.focused_faction();
        let mut display = self.display.borrow_mut();
        if let Some(list) = display.list_mut(faction) {
            self.search(faction).borrow_mut().choose(list);
        }
        self.mode = Mode::Normal;
    }

    pub fn search_input(&mut self, c: char) {
        let faction = self.focused_faction();
        let display = self.display.borrow();
        self.search(faction).borrow_mut().push_char(c, display.list(faction));
    }

    pub fn search_backspace(&mut self) {
        let faction = self.focused_faction();
        let display = self.display.borrow();
        self.search(faction).borrow_mut().backspace(display.list(faction));
    }

    pub fn open_selector(&mut self) {
        self.selector.borrow_mut().open();
        self.mode = Mode::Selector;
    }

    /// Selects the highlighted selector entry and closes the overlay.
    pub fn confirm_selector(&mut self) {
        let raw = self.selector.borrow().cursor().raw();
        self.mode = Mode::Normal;
        self.select_war(raw);
    }

    /// Selects the war after the current one.
    pub fn next_war(&mut self) {
        let raw = self.selector.borrow().value().next().raw();
        self.select_war(raw);
    }

    pub fn prev_war(&mut self) {
        let raw = self.selector.borrow().value().prev().raw();
        self.select_war(raw);
    }
}

#[cfg(test)]
mod tests {
    use warstats_core::selection::WarId;

    use super::*;
    use crate::controller::tests::war_entry;

    fn state() -> (AppState, crossbeam_channel::Receiver<LoadRequest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let state = AppState::new(tx, 1).unwrap();
        state.display.borrow_mut().set_viewport_height(10);
        (state, rx)
    }

    fn load(state: &mut AppState, war: u8, players: usize) {
        let war = WarId::new(i64::from(war)).unwrap();
        state.apply_load(LoadOutcome { war, result: Ok(war_entry(players, players)) });
    }

    #[test]
    fn every_component_hears_a_selection() {
        let (mut state, rx) = state();
        assert_eq!(state.bus.listener_count::<SelectedWar>(), 4);
        assert!(state.select_war(12));
        assert_eq!(state.selector.borrow().value().raw(), 12);
        assert_eq!(rx.try_recv().unwrap().war.get(), 12);
        assert!(!state.display.borrow().base_page_visible());
        assert_eq!(state.take_pending_location().as_deref(), Some("war=12"));
        assert!(state.take_pending_location().is_none());
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let (mut state, rx) = state();
        assert!(!state.select_war(65));
        assert!(!state.select_war(-1));
        assert!(rx.try_recv().is_err());
        assert!(state.take_pending_location().is_none());
    }

    #[test]
    fn location_round_trips_through_restore() {
        let (mut state, _rx) = state();
        state.restore_location("lang=en");
        state.select_war(7);
        let saved = state.location().to_owned();
        assert_eq!(saved, "lang=en&war=7");

        let (mut reloaded, rx) = self::state();
        reloaded.restore_location(&saved);
        assert_eq!(reloaded.selector.borrow().value().raw(), 7);
        assert_eq!(rx.try_recv().unwrap().war.get(), 7);
        assert!(reloaded.take_pending_location().is_none());

        state.select_war(0);
        assert_eq!(state.location(), "lang=en");
    }

    #[test]
    fn status_line_reports_loads_and_failures() {
        let (mut state, _rx) = state();
        state.select_war(1);
        load(&mut state, 1, 3);
        assert_eq!(state.status.borrow().message(), Some("war 1: 3 wardens, 3 colonials"));

        state.select_war(2);
        let err = CoreError::Io {
            path: "wars/2.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        state.apply_load(LoadOutcome { war: WarId::new(2).unwrap(), result: Err(err) });
        assert!(state.status.borrow().message().unwrap().contains("wars/2.json"));
    }

    #[test]
    fn paging_scrolls_the_focused_roster() {
        let (mut state, _rx) = state();
        state.select_war(1);
        load(&mut state, 1, 100);
        state.focus = PanelFocus::Colonial;
        state.full_page_down();
        state.half_page_down();
        let display = state.display.borrow();
        assert_eq!(display.list(Faction::Colonial).unwrap().scroll_offset(), 15);
        assert_eq!(display.list(Faction::Warden).unwrap().scroll_offset(), 0);
    }

    #[test]
    fn disconnect_detaches_everything() {
        let (mut state, _rx) = state();
        state.disconnect();
        assert_eq!(state.bus.listener_count::<SelectedWar>(), 0);
        assert_eq!(state.bus.listener_count::<WarEntryLoaded>(), 0);
    }
}
