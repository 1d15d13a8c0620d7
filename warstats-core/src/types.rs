//! War record types as published in `wars/<id>.json`.
//!
//! Field names follow the camelCase keys of the JSON documents. Timestamps are
//! milliseconds since the Unix epoch.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// One of the two opposing sides of a war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Warden,
    Colonial,
}

impl Faction {
    /// Both factions, in the order the rosters are laid out on screen.
    pub const ALL: [Faction; 2] = [Faction::Warden, Faction::Colonial];

    /// Lowercase name as it appears in the JSON documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Warden => "warden",
            Faction::Colonial => "colonial",
        }
    }

    /// Human-facing label for panel titles.
    pub fn label(self) -> &'static str {
        match self {
            Faction::Warden => "Wardens",
            Faction::Colonial => "Colonials",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single player entry inside a faction roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub username: String,
    /// String-encoded integer commendation count.
    pub commends: String,
    pub steam_id: String,
}

/// Skirmish tallies for a war.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Skirmish {
    pub warden: i64,
    pub colonial: i64,
    pub none: i64,
}

/// A complete war record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarEntry {
    pub war_id: String,
    pub warden: Roster,
    pub colonial: Roster,
    pub winner: Faction,
    pub start: i64,
    pub end: i64,
    pub conquest_start: i64,
    pub conquest_end: i64,
    #[serde(default)]
    pub skirmish: Skirmish,
}

impl WarEntry {
    /// The roster for `faction`.
    pub fn roster(&self, faction: Faction) -> &Roster {
        match faction {
            Faction::Warden => &self.warden,
            Faction::Colonial => &self.colonial,
        }
    }
}

/// Keyed faction roster.
///
/// Entries iterate the way the published documents are read by the web
/// front end: keys that are canonical array indices (`"0"`, `"17"`, but not
/// `"007"`) come first in ascending numeric order, every other key follows in
/// document order. The exported rosters are keyed by rank position, so this
/// ordering is what puts the highest commendation counts first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<(String, UserEntry)>,
}

impl Roster {
    /// Builds a roster from `(key, entry)` pairs given in document order.
    pub fn from_document_order(mut entries: Vec<(String, UserEntry)>) -> Self {
        // Stable sort: index keys ascend, the rest keep their relative order.
        entries.sort_by_key(|(key, _)| match array_index(key) {
            Some(index) => (0, index),
            None => (1, 0),
        });
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in roster order.
    pub fn values(&self) -> impl Iterator<Item = &UserEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }
}

/// Parses `key` as a canonical array index: no sign, no leading zeros
/// (other than `"0"` itself), and below `u32::MAX`.
fn array_index(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    let index: u64 = key.parse().ok()?;
    (index < u64::from(u32::MAX)).then_some(index)
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = Roster;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of roster keys to player entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Roster, A::Error> {
                let capacity = map.size_hint().unwrap_or(0);
                let mut entries: Vec<(String, UserEntry)> = Vec::with_capacity(capacity);
                let mut slots: HashMap<String, usize> = HashMap::with_capacity(capacity);
                while let Some((key, entry)) = map.next_entry::<String, UserEntry>()? {
                    // A repeated key keeps its first position but takes the last value.
                    match slots.get(&key) {
                        Some(&slot) => entries[slot].1 = entry,
                        None => {
                            slots.insert(key.clone(), entries.len());
                            entries.push((key, entry));
                        }
                    }
                }
                Ok(Roster::from_document_order(entries))
            }
        }

        deserializer.deserialize_map(RosterVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> UserEntry {
        UserEntry { username: name.to_owned(), commends: "1".to_owned(), steam_id: "7656".to_owned() }
    }

    #[test]
    fn index_keys_sort_numerically_before_named_keys() {
        let roster = Roster::from_document_order(vec![
            ("b".to_owned(), entry("named-b")),
            ("10".to_owned(), entry("ten")),
            ("2".to_owned(), entry("two")),
            ("007".to_owned(), entry("padded")),
            ("a".to_owned(), entry("named-a")),
        ]);
        let names: Vec<&str> = roster.values().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["two", "ten", "named-b", "padded", "named-a"]);
    }

    #[test]
    fn repeated_key_keeps_first_slot_and_last_value() {
        let json = r#"{
            "x": {"username": "first", "commends": "1", "steamId": "1"},
            "y": {"username": "middle", "commends": "1", "steamId": "2"},
            "x": {"username": "last", "commends": "1", "steamId": "3"}
        }"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.len(), 2);
        let names: Vec<&str> = roster.values().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["last", "middle"]);
    }

    #[test]
    fn war_entry_parses_camel_case_document() {
        let json = r#"{
            "warId": "12",
            "warden": {"1": {"username": "b", "commends": "3", "steamId": "2"},
                       "0": {"username": "a", "commends": "9", "steamId": "1"}},
            "colonial": {},
            "winner": "colonial",
            "start": 1, "end": 2, "conquestStart": 3, "conquestEnd": 4,
            "skirmish": {"warden": 5, "colonial": 6, "none": 7}
        }"#;
        let war: WarEntry = serde_json::from_str(json).unwrap();
        assert_eq!(war.winner, Faction::Colonial);
        assert_eq!(war.conquest_end, 4);
        assert_eq!(war.skirmish.none, 7);
        let names: Vec<&str> = war.warden.values().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(war.roster(Faction::Colonial).is_empty());
    }
}
