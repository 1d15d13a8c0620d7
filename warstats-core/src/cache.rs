//! Per-war caches owned by the display controller.
//!
//! Revisiting a war reuses both the parsed record and the ranked rows built
//! the first time. Writes are last-writer-wins; there is a single UI thread.

use std::collections::HashMap;
use std::sync::Arc;

use crate::roster::{rank_roster, PlayerRow};
use crate::selection::WarId;
use crate::types::{Faction, WarEntry};

/// Parsed war records by id.
#[derive(Debug, Default)]
pub struct WarCache {
    wars: HashMap<WarId, Arc<WarEntry>>,
}

impl WarCache {
    pub fn get(&self, war: WarId) -> Option<Arc<WarEntry>> {
        self.wars.get(&war).cloned()
    }

    pub fn insert(&mut self, war: WarId, entry: Arc<WarEntry>) {
        self.wars.insert(war, entry);
    }

    pub fn len(&self) -> usize {
        self.wars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wars.is_empty()
    }
}

/// Ranked roster rows by war and faction.
#[derive(Debug, Default)]
pub struct RowCache {
    rows: HashMap<(WarId, Faction), Arc<[PlayerRow]>>,
}

impl RowCache {
    /// Cached rows for `(war, faction)`, ranking `entry` on first use.
    pub fn get_or_rank(&mut self, war: WarId, faction: Faction, entry: &WarEntry) -> Arc<[PlayerRow]> {
        Arc::clone(
            self.rows
                .entry((war, faction))
                .or_insert_with(|| rank_roster(entry.roster(faction))),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Roster, Skirmish, UserEntry};

    fn war_with(names: &[&str]) -> WarEntry {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                (i.to_string(), UserEntry {
                    username: (*n).to_owned(),
                    commends: (100 - i).to_string(),
                    steam_id: i.to_string(),
                })
            })
            .collect();
        WarEntry {
            war_id: "3".to_owned(),
            warden: Roster::from_document_order(entries),
            colonial: Roster::default(),
            winner: Faction::Warden,
            start: 0,
            end: 0,
            conquest_start: 0,
            conquest_end: 0,
            skirmish: Skirmish::default(),
        }
    }

    #[test]
    fn rows_are_ranked_once_and_reused() {
        let war = WarId::new(3).unwrap();
        let entry = war_with(&["a", "b"]);
        let mut cache = RowCache::default();
        assert!(cache.is_empty());

        let first = cache.get_or_rank(war, Faction::Warden, &entry);
        let again = cache.get_or_rank(war, Faction::Warden, &war_with(&["ignored"]));
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.len(), 2);

        let colonial = cache.get_or_rank(war, Faction::Colonial, &entry);
        assert!(colonial.is_empty());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn last_writer_wins() {
        let war = WarId::new(5).unwrap();
        let mut wars = WarCache::default();
        assert!(wars.is_empty());
        wars.insert(war, Arc::new(war_with(&["a"])));
        wars.insert(war, Arc::new(war_with(&["x", "y"])));
        assert_eq!(wars.get(war).map(|w| w.warden.len()), Some(2));
        assert_eq!(wars.len(), 1);
    }
}
