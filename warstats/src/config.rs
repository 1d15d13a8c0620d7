//! User configuration loaded from `config.toml`.
//!
//! Every field has a default, and a missing or unreadable file is not an
//! error: the viewer always starts, and the problem is reported through the
//! log once logging is up.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings read from `$XDG_CONFIG_HOME/warstats/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name, see [`crate::theme::Theme::from_name`].
    pub theme: String,
    /// Directory containing `wars/<id>.json`.
    pub data_dir: PathBuf,
    /// Directory for the state database and the log file.
    pub state_dir: PathBuf,
    /// Terminal lines per roster row.
    pub item_height: u32,
    /// `tracing` filter directive used when `WARSTATS_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            data_dir: PathBuf::from("."),
            state_dir: PathBuf::from(".warstats"),
            item_height: 1,
            log_filter: "info".to_owned(),
        }
    }
}

/// Returns the path to the warstats config file.
///
/// Prefers `$XDG_CONFIG_HOME/warstats/config.toml`; falls back to
/// `~/.config/warstats/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("warstats").join("config.toml")
}

/// Loads the config at `path`.
///
/// Returns the defaults when the file does not exist. A file that exists but
/// cannot be read or parsed also yields the defaults, together with a
/// description of the problem for the caller to log.
pub fn load_config(path: &Path) -> (Config, Option<String>) {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (Config::default(), None),
        Err(e) => {
            return (Config::default(), Some(format!("cannot read {}: {e}", path.display())));
        }
    };
    parse_config(&raw)
        .map(|config| (config, None))
        .unwrap_or_else(|e| (Config::default(), Some(format!("config parse error in {}: {e}", path.display()))))
}

/// Parses config text; unspecified keys take their defaults.
///
/// # Errors
///
/// Returns the TOML error for malformed text or mistyped values.
pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config("item_height = 2\ndata_dir = \"/srv/foxhole\"").unwrap();
        assert_eq!(config.item_height, 2);
        assert_eq!(config.data_dir, PathBuf::from("/srv/foxhole"));
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn missing_file_is_silent_and_bad_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let (config, warning) = load_config(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "item_height = \"tall\"").unwrap();
        let (config, warning) = load_config(&bad);
        assert_eq!(config, Config::default());
        assert!(warning.unwrap().contains("config parse error"));
    }
}
