//! War display controller.
//!
//! [`WarDisplay`] reacts to [`SelectedWar`]: it hides or shows the war content,
//! pulls the record from its cache or asks the loader thread for it, ranks
//! each faction's roster (caching the rows) and mounts one [`VirtualList`] per
//! faction at the current panel height. Once a war is on screen it announces
//! it with [`WarEntryLoaded`].

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};
use warstats_core::bus::{listener, EventBus, SelectedWar, Subscription, WarEntryLoaded};
use warstats_core::cache::{RowCache, WarCache};
use warstats_core::roster::PlayerRow;
use warstats_core::selection::{WarId, WarSelection};
use warstats_core::source::WarSource;
use warstats_core::types::{Faction, WarEntry};
use warstats_core::virtual_list::{VirtualList, VirtualListConfig};
use warstats_core::CoreError;

use crate::loader::{LoadOutcome, LoadRequest};

/// Summary shown above the rosters for the war on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarHeader {
    pub war: WarId,
    pub winner: Faction,
    /// Milliseconds since the epoch.
    pub start: i64,
    /// End of the conquest phase, milliseconds since the epoch.
    pub end: i64,
    /// Data file the record came from, relative to the data directory.
    pub source: String,
}

impl WarHeader {
    fn from_entry(war: WarId, entry: &WarEntry) -> Self {
        Self {
            war,
            winner: entry.winner,
            start: entry.start,
            end: entry.conquest_end,
            source: WarSource::relative_path(war),
        }
    }
}

/// The two mounted rosters of the war on screen.
#[derive(Debug)]
struct Rosters {
    warden: VirtualList<PlayerRow>,
    colonial: VirtualList<PlayerRow>,
}

impl Rosters {
    fn get(&self, faction: Faction) -> &VirtualList<PlayerRow> {
        match faction {
            Faction::Warden => &self.warden,
            Faction::Colonial => &self.colonial,
        }
    }

    fn get_mut(&mut self, faction: Faction) -> &mut VirtualList<PlayerRow> {
        match faction {
            Faction::Warden => &mut self.warden,
            Faction::Colonial => &mut self.colonial,
        }
    }
}

/// Owns everything needed to put the selected war on screen.
#[derive(Debug)]
pub struct WarDisplay {
    wars: WarCache,
    rows: RowCache,
    loader: Sender<LoadRequest>,
    /// Wars requested from the loader whose outcome has not arrived yet.
    pending: HashSet<WarId>,
    bus: Weak<EventBus>,
    item_height: u32,
    viewport_height: u64,
    selection: WarSelection,
    base_page_visible: bool,
    loading: bool,
    header: Option<WarHeader>,
    last_error: Option<String>,
    rosters: Option<Rosters>,
}

impl WarDisplay {
    /// Creates a display that sends load requests to `loader` and lays rows
    /// out `item_height` lines apart.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidItemHeight`] for a zero item height.
    pub fn new(loader: Sender<LoadRequest>, item_height: u32) -> Result<Self, CoreError> {
        if item_height == 0 {
            return Err(CoreError::InvalidItemHeight);
        }
        Ok(Self {
            wars: WarCache::default(),
            rows: RowCache::default(),
            loader,
            pending: HashSet::new(),
            bus: Weak::new(),
            item_height,
            viewport_height: 0,
            selection: WarSelection::None,
            base_page_visible: true,
            loading: false,
            header: None,
            last_error: None,
            rosters: None,
        })
    }

    /// Subscribes `display` to [`SelectedWar`] on `bus` and lets it publish
    /// [`WarEntryLoaded`] there.
    ///
    /// [`WarEntryLoaded`] listeners run while the display is borrowed, so
    /// they must not borrow it themselves.
    pub fn connect(display: &Rc<RefCell<Self>>, bus: &Rc<EventBus>) -> Subscription {
        display.borrow_mut().bus = Rc::downgrade(bus);
        let weak = Rc::downgrade(display);
        bus.attach::<SelectedWar>(listener(move |selection: &WarSelection| {
            if let Some(display) = weak.upgrade() {
                display.borrow_mut().handle_selection(*selection);
            }
        }))
    }

    /// Applies a selector change.
    pub fn handle_selection(&mut self, selection: WarSelection) {
        self.selection = selection;
        self.rosters = None;
        self.last_error = None;

        let Some(war) = selection.war() else {
            self.base_page_visible = true;
            self.loading = false;
            self.header = None;
            return;
        };

        self.base_page_visible = false;
        self.loading = true;
        self.header = None;

        if let Some(entry) = self.wars.get(war) {
            debug!(%war, "war cache hit");
            self.show(war, entry);
            return;
        }

        if self.pending.contains(&war) {
            debug!(%war, "war load already in flight");
            return;
        }

        debug!(%war, "requesting war load");
        if self.loader.send(LoadRequest { war }).is_err() {
            warn!(%war, "loader thread is gone");
            self.loading = false;
            self.last_error = Some(format!("cannot load war {war}: loader stopped"));
            return;
        }
        self.pending.insert(war);
    }

    /// Takes a finished load. The record is cached either way; it is only put
    /// on screen if its war is still the selected one and not already shown.
    ///
    /// Returns the entry when it was displayed.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Option<Arc<WarEntry>> {
        let LoadOutcome { war, result } = outcome;
        self.pending.remove(&war);
        let current = self.selection.war() == Some(war);
        let on_screen = self.header.as_ref().map(|h| h.war) == Some(war);

        match result {
            Ok(entry) => {
                let entry = Arc::new(entry);
                self.wars.insert(war, Arc::clone(&entry));
                if !current {
                    debug!(%war, "load superseded by a newer selection; cached only");
                    return None;
                }
                if on_screen {
                    debug!(%war, "war already on screen; cached only");
                    return None;
                }
                self.show(war, Arc::clone(&entry));
                Some(entry)
            }
            Err(e) => {
                if current && !on_screen {
                    self.loading = false;
                    self.last_error = Some(e.to_string());
                }
                None
            }
        }
    }

    fn show(&mut self, war: WarId, entry: Arc<WarEntry>) {
        match self.build(war, &entry) {
            Ok(rosters) => {
                info!(
                    %war,
                    cached_wars = self.wars.len(),
                    wardens = rosters.warden.total_rows(),
                    colonials = rosters.colonial.total_rows(),
                    "war displayed"
                );
                self.rosters = Some(rosters);
                self.header = Some(WarHeader::from_entry(war, &entry));
                self.loading = false;
                if let Some(bus) = self.bus.upgrade() {
                    bus.publish::<WarEntryLoaded>(&entry);
                }
            }
            Err(e) => {
                self.loading = false;
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn build(&mut self, war: WarId, entry: &WarEntry) -> Result<Rosters, CoreError> {
        let mut list_for = |faction: Faction| -> Result<VirtualList<PlayerRow>, CoreError> {
            let rows = self.rows.get_or_rank(war, faction, entry);
            let mut list = VirtualList::new(VirtualListConfig::new(rows, self.item_height))?;
            if self.viewport_height > 0 {
                list.mount(self.viewport_height);
            }
            Ok(list)
        };
        Ok(Rosters { warden: list_for(Faction::Warden)?, colonial: list_for(Faction::Colonial)? })
    }

    /// Records the roster panels' inner height and remounts both lists when
    /// it changed, keeping each list's scroll position.
    pub fn set_viewport_height(&mut self, height: u64) {
        if height == self.viewport_height {
            return;
        }
        self.viewport_height = height;
        let Some(rosters) = self.rosters.as_mut() else { return };
        for faction in Faction::ALL {
            let list = rosters.get_mut(faction);
            if height == 0 {
                list.unmount();
                continue;
            }
            let offset = list.scroll_offset();
            list.mount(height);
            list.set_scroll_offset(offset);
        }
        debug!(height, "rosters remounted");
    }

    pub fn list(&self, faction: Faction) -> Option<&VirtualList<PlayerRow>> {
        self.rosters.as_ref().map(|r| r.get(faction))
    }

    pub fn list_mut(&mut self, faction: Faction) -> Option<&mut VirtualList<PlayerRow>> {
        self.rosters.as_mut().map(|r| r.get_mut(faction))
    }

    pub fn selection(&self) -> WarSelection {
        self.selection
    }

    /// True while no war is selected.
    pub fn base_page_visible(&self) -> bool {
        self.base_page_visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn header(&self) -> Option<&WarHeader> {
        self.header.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn viewport_height(&self) -> u64 {
        self.viewport_height
    }
}
