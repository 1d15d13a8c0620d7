//! Player lookup over a roster's row sequence.

use crate::roster::PlayerRow;
use crate::virtual_list::VirtualList;

/// Most hits a search returns.
pub const MAX_RESULTS: usize = 10;

/// Fields a row exposes to search.
pub trait Searchable {
    /// Matched case-insensitively.
    fn display_name(&self) -> &str;
    /// Matched verbatim.
    fn raw_id(&self) -> &str;
}

impl Searchable for PlayerRow {
    fn display_name(&self) -> &str {
        &self.username
    }

    fn raw_id(&self) -> &str {
        &self.steam_id
    }
}

/// A matching row and the scroll offset that brings it to the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub index: usize,
    pub offset: u64,
}

/// Scans `items` in order for rows whose name contains `query` (ignoring
/// case) or whose id contains `query`, returning at most `limit` hits.
///
/// An empty query matches nothing.
pub fn search<T: Searchable>(items: &[T], item_height: u32, query: &str, limit: usize) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.display_name().to_lowercase().contains(&needle) || item.raw_id().contains(query)
        })
        .take(limit)
        .map(|(index, _)| SearchHit { index, offset: index as u64 * u64::from(item_height) })
        .collect()
}

/// [`search`] over a virtual list's items with its row height and
/// [`MAX_RESULTS`].
pub fn search_list<T: Searchable>(list: &VirtualList<T>, query: &str) -> Vec<SearchHit> {
    search(list.items(), list.item_height(), query, MAX_RESULTS)
}
