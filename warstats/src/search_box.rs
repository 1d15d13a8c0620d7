//! Player lookup box for one faction roster.
//!
//! Typing re-runs the search over the roster's rows; choosing a hit scrolls
//! the roster so that player sits at the top of the panel. A new war
//! selection empties the box.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;
use warstats_core::bus::{listener, EventBus, SelectedWar, Subscription};
use warstats_core::roster::PlayerRow;
use warstats_core::search::{search_list, SearchHit};
use warstats_core::selection::WarSelection;
use warstats_core::types::Faction;
use warstats_core::virtual_list::VirtualList;

#[derive(Debug)]
pub struct PlayerSearch {
    faction: Faction,
    query: String,
    hits: Vec<SearchHit>,
    selected: usize,
}

impl PlayerSearch {
    pub fn new(faction: Faction) -> Self {
        Self { faction, query: String::new(), hits: Vec::new(), selected: 0 }
    }

    /// Clears the box whenever [`SelectedWar`] is published on `bus`.
    pub fn connect(search: &Rc<RefCell<Self>>, bus: &EventBus) -> Subscription {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(search);
        bus.attach::<SelectedWar>(listener(move |_: &WarSelection| {
            if let Some(search) = weak.upgrade() {
                search.borrow_mut().reset();
            }
        }))
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    /// Index into [`Self::hits`] of the highlighted hit.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Appends `c` to the query and searches again.
    pub fn push_char(&mut self, c: char, list: Option<&VirtualList<PlayerRow>>) {
        self.query.push(c);
        self.refresh(list);
    }

    /// Drops the last query character and searches again.
    pub fn backspace(&mut self, list: Option<&VirtualList<PlayerRow>>) {
        self.query.pop();
        self.refresh(list);
    }

    /// Replaces the hits with a fresh search for the current query. With no
    /// roster on screen there is nothing to match.
    pub fn refresh(&mut self, list: Option<&VirtualList<PlayerRow>>) {
        self.hits.clear();
        self.selected = 0;
        if let Some(list) = list {
            self.hits = search_list(list, &self.query);
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.hits.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Scrolls `list` to the highlighted hit and empties the box.
    ///
    /// Returns the chosen hit, or `None` when there was nothing to choose.
    pub fn choose(&mut self, list: &mut VirtualList<PlayerRow>) -> Option<SearchHit> {
        let hit = *self.hits.get(self.selected)?;
        debug!(faction = %self.faction, index = hit.index, offset = hit.offset, "search hit chosen");
        list.set_scroll_offset(hit.offset);
        self.reset();
        Some(hit)
    }

    /// Empties the query and the hits.
    pub fn reset(&mut self) {
        self.query.clear();
        self.hits.clear();
        self.selected = 0;
    }

    /// Focus left the box: hits are dropped, the query stays.
    pub fn blur(&mut self) {
        self.hits.clear();
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warstats_core::roster::rank_roster;
    use warstats_core::virtual_list::VirtualListConfig;

    use super::*;
    use crate::controller::tests::war_entry;

    fn roster(players: usize) -> VirtualList<PlayerRow> {
        let entry = war_entry(players, 0);
        let rows: Arc<[PlayerRow]> = rank_roster(&entry.warden);
        let mut list = VirtualList::new(VirtualListConfig::new(rows, 2)).unwrap();
        list.mount(10);
        list
    }

    fn typed(search: &mut PlayerSearch, text: &str, list: &VirtualList<PlayerRow>) {
        for c in text.chars() {
            search.push_char(c, Some(list));
        }
    }

    #[test]
    fn typing_searches_and_backspace_to_empty_clears() {
        let list = roster(40);
        let mut search = PlayerSearch::new(Faction::Warden);
        typed(&mut search, "WARDEN3", &list);
        // warden3, warden30..warden39
        assert_eq!(search.hits().len(), 10);
        assert_eq!(search.hits()[0].index, 3);
        assert_eq!(search.hits()[0].offset, 6);

        for _ in 0.."WARDEN3".len() {
            search.backspace(Some(&list));
        }
        assert_eq!(search.query(), "");
        assert!(search.hits().is_empty());
    }

    #[test]
    fn choosing_scrolls_the_roster_and_empties_the_box() {
        let mut list = roster(40);
        let mut search = PlayerSearch::new(Faction::Warden);
        typed(&mut search, "warden2", &list);
        search.select_next();
        search.select_next();
        let hit = search.choose(&mut list).unwrap();
        assert_eq!(hit.index, 21);
        assert_eq!(list.scroll_offset(), 42);
        assert!(list.visible().any(|(p, _)| p.index == 21));
        assert_eq!(search.query(), "");
        assert!(search.choose(&mut list).is_none());
    }

    #[test]
    fn selection_stays_within_hits() {
        let list = roster(5);
        let mut search = PlayerSearch::new(Faction::Warden);
        typed(&mut search, "warden4", &list);
        search.select_next();
        assert_eq!(search.selected(), 0);
        search.select_prev();
        assert_eq!(search.selected(), 0);
    }

    #[test]
    fn blur_keeps_query_and_war_change_resets() {
        let list = roster(5);
        let bus = EventBus::new();
        let search = Rc::new(RefCell::new(PlayerSearch::new(Faction::Warden)));
        let _sub = PlayerSearch::connect(&search, &bus);

        typed(&mut search.borrow_mut(), "warden", &list);
        search.borrow_mut().blur();
        assert_eq!(search.borrow().query(), "warden");
        assert!(search.borrow().hits().is_empty());

        bus.publish::<SelectedWar>(&WarSelection::None);
        assert_eq!(search.borrow().query(), "");
    }

    #[test]
    fn no_roster_means_no_hits() {
        let mut search = PlayerSearch::new(Faction::Colonial);
        search.push_char('a', None);
        assert_eq!(search.query(), "a");
        assert!(search.hits().is_empty());
    }
}
