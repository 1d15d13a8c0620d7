//! War selection values and the `war=` location parameter.
//!
//! The selected war round-trips through a query string (for example
//! `war=12&lang=en`) so a location can be saved, passed on the command line,
//! and restored. Reading never fails: anything that is not a war id in
//! `1..=64` reads back as "no selection".

use std::fmt;

use url::form_urlencoded;

use crate::roster::parse_int_prefix;

/// Name of the query parameter holding the selected war.
pub const WAR_PARAM: &str = "war";

/// Highest war id the selector offers.
pub const MAX_WAR_ID: u8 = 64;

/// A war id in `1..=MAX_WAR_ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarId(u8);

impl WarId {
    /// Returns `None` outside `1..=MAX_WAR_ID`.
    pub fn new(id: i64) -> Option<Self> {
        u8::try_from(id)
            .ok()
            .filter(|id| (1..=MAX_WAR_ID).contains(id))
            .map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every selectable war, ascending.
    pub fn all() -> impl Iterator<Item = WarId> {
        (1..=MAX_WAR_ID).map(WarId)
    }
}

impl fmt::Display for WarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value of the war selector. `0` on the wire means [`WarSelection::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WarSelection {
    /// Nothing selected; the content area is hidden.
    #[default]
    None,
    War(WarId),
}

impl WarSelection {
    /// Interprets a raw selector value. Returns `None` for values that are
    /// neither `0` nor a valid war id, which callers ignore.
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw == 0 {
            return Some(Self::None);
        }
        WarId::new(raw).map(Self::War)
    }

    /// Raw selector value: `0` for no selection.
    pub fn raw(self) -> i64 {
        match self {
            Self::None => 0,
            Self::War(id) => i64::from(id.get()),
        }
    }

    pub fn war(self) -> Option<WarId> {
        match self {
            Self::None => None,
            Self::War(id) => Some(id),
        }
    }

    /// The following selector entry, saturating at the last war.
    pub fn next(self) -> Self {
        Self::from_raw((self.raw() + 1).min(i64::from(MAX_WAR_ID))).unwrap_or(self)
    }

    /// The preceding selector entry, saturating at "no selection".
    pub fn prev(self) -> Self {
        Self::from_raw((self.raw() - 1).max(0)).unwrap_or(self)
    }
}

impl fmt::Display for WarSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("No war selected"),
            Self::War(id) => write!(f, "War {id}"),
        }
    }
}

/// Reads the selected war from a query string. A leading `?` is accepted.
///
/// Absent, unparseable, zero, and out-of-range values all give
/// [`WarSelection::None`].
pub fn selection_from_query(query: &str) -> WarSelection {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == WAR_PARAM)
        .and_then(|(_, value)| parse_int_prefix(&value))
        .and_then(WarId::new)
        .map_or(WarSelection::None, WarSelection::War)
}

/// Rewrites `query` so that it records `selection`.
///
/// A war sets `war=<id>`, replacing any existing value in place; no selection
/// removes the parameter. Other parameters keep their order.
pub fn query_with_selection(query: &str, selection: WarSelection) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    match selection {
        WarSelection::None => pairs.retain(|(key, _)| key != WAR_PARAM),
        WarSelection::War(id) => {
            let value = id.to_string();
            let mut replaced = false;
            pairs.retain_mut(|(key, v)| {
                if key.as_str() != WAR_PARAM {
                    return true;
                }
                if replaced {
                    return false;
                }
                replaced = true;
                v.clone_from(&value);
                true
            });
            if !replaced {
                pairs.push((WAR_PARAM.to_owned(), value));
            }
        }
    }

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn war_id_bounds() {
        assert!(WarId::new(0).is_none());
        assert_eq!(WarId::new(1).map(WarId::get), Some(1));
        assert_eq!(WarId::new(64).map(WarId::get), Some(64));
        assert!(WarId::new(65).is_none());
        assert!(WarId::new(-3).is_none());
        assert_eq!(WarId::all().count(), 64);
    }

    #[test]
    fn raw_values_map_to_selections() {
        assert_eq!(WarSelection::from_raw(0), Some(WarSelection::None));
        assert_eq!(WarSelection::from_raw(12).and_then(WarSelection::war).map(WarId::get), Some(12));
        assert_eq!(WarSelection::from_raw(65), None);
        assert_eq!(WarSelection::from_raw(-1), None);
    }

    #[test]
    fn next_and_prev_saturate() {
        assert_eq!(WarSelection::None.prev(), WarSelection::None);
        assert_eq!(WarSelection::None.next().raw(), 1);
        let last = WarSelection::from_raw(64).unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(WarSelection::from_raw(1).unwrap().prev(), WarSelection::None);
    }

    #[test]
    fn other_parameters_survive_rewrites() {
        let q = query_with_selection("?lang=en&war=3&x=1", WarSelection::from_raw(9).unwrap());
        assert_eq!(q, "lang=en&war=9&x=1");
        let cleared = query_with_selection(&q, WarSelection::None);
        assert_eq!(cleared, "lang=en&x=1");
        assert_eq!(query_with_selection("", WarSelection::from_raw(2).unwrap()), "war=2");
    }
}
