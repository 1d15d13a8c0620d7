//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use warstats_core::selection::{query_with_selection, WarSelection};

/// Browse Foxhole war statistics: faction leaderboards and player lookup.
#[derive(Debug, Default, Parser)]
#[command(name = "warstats", version)]
pub struct Args {
    /// Directory containing `wars/<id>.json` (overrides the config file).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// War to open on startup (1-64; 0 opens no war).
    #[arg(long, value_name = "ID", allow_negative_numbers = true)]
    pub war: Option<i64>,

    /// Location query to start from, e.g. `war=12`. Takes precedence over `--war`.
    #[arg(long, value_name = "QUERY")]
    pub location: Option<String>,

    /// Alternate config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Picks the location the viewer starts at: `--location`, then `--war`
/// applied to the saved location, then the saved location itself.
///
/// A `--war` value outside the selector's range is ignored.
pub fn initial_location(args: &Args, saved: Option<String>) -> String {
    if let Some(query) = &args.location {
        return query.clone();
    }
    let saved = saved.unwrap_or_default();
    match args.war.and_then(WarSelection::from_raw) {
        Some(selection) => query_with_selection(&saved, selection),
        None => saved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_flag_wins() {
        let args = Args { location: Some("war=4".into()), war: Some(9), ..Args::default() };
        assert_eq!(initial_location(&args, Some("war=1".into())), "war=4");
    }

    #[test]
    fn war_flag_rewrites_saved_location() {
        let args = Args { war: Some(9), ..Args::default() };
        assert_eq!(initial_location(&args, Some("lang=en&war=1".into())), "lang=en&war=9");
        let none = Args { war: Some(0), ..Args::default() };
        assert_eq!(initial_location(&none, Some("war=1".into())), "");
    }

    #[test]
    fn out_of_range_war_flag_is_ignored() {
        let args = Args { war: Some(65), ..Args::default() };
        assert_eq!(initial_location(&args, Some("war=3".into())), "war=3");
        assert_eq!(initial_location(&Args::default(), None), "");
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from(["warstats", "--war", "12", "--data-dir", "/tmp/wars"]).unwrap();
        assert_eq!(args.war, Some(12));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/wars")));
    }
}
