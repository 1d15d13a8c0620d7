//! Commendation ranking and the row type the roster panels display.

use std::fmt;
use std::sync::Arc;

use crate::types::{Roster, UserEntry};

/// Ceiling the ranking walk starts from; any real count is below it.
const RANK_CEILING: i64 = 999_999_999;

/// Position of a player within a faction leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    /// First player to reach a new, lower commendation count.
    Ranked(u32),
    /// Shares the count of the player above, or has no readable count.
    Tied,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ranked(n) => write!(f, "{n}"),
            Rank::Tied => f.write_str("-"),
        }
    }
}

/// One rendered roster row: rank badge, commendations, and the linked name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub rank: Rank,
    pub username: String,
    /// Commendations exactly as published.
    pub commends: String,
    /// Parsed commendation count, `None` when the text has no leading integer.
    pub commend_count: Option<i64>,
    pub steam_id: String,
}

impl PlayerRow {
    /// Steam community profile for this player.
    pub fn profile_url(&self) -> String {
        format!("https://steamcommunity.com/profiles/{}", self.steam_id)
    }
}

/// Ranks a roster in iteration order.
///
/// Rosters are published sorted by commendations, highest first. Each player
/// whose count drops below every count seen so far opens a new rank; everyone
/// else is shown as tied.
pub fn rank_roster(roster: &Roster) -> Arc<[PlayerRow]> {
    rank_entries(roster.values())
}

/// Ranks any sequence of entries; see [`rank_roster`].
pub fn rank_entries<'a>(entries: impl IntoIterator<Item = &'a UserEntry>) -> Arc<[PlayerRow]> {
    let mut score: u32 = 0;
    let mut ceiling = RANK_CEILING;

    entries
        .into_iter()
        .map(|entry| {
            let commend_count = parse_int_prefix(&entry.commends);
            let rank = match commend_count {
                Some(count) if ceiling > count => {
                    score += 1;
                    ceiling = count;
                    Rank::Ranked(score)
                }
                _ => Rank::Tied,
            };
            PlayerRow {
                rank,
                username: entry.username.clone(),
                commends: entry.commends.clone(),
                commend_count,
                steam_id: entry.steam_id.clone(),
            }
        })
        .collect()
}

/// Reads the leading integer of `text`, the way the published data has always
/// been interpreted: leading whitespace and a sign are skipped, a `0x` prefix
/// switches to hexadecimal, and parsing stops at the first non-digit.
///
/// Returns `None` when no digit follows. Values outside `i64` saturate.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        seen = true;
        value = value.saturating_mul(i64::from(radix)).saturating_add(i64::from(d));
    }

    seen.then(|| if negative { -value } else { value })
}
