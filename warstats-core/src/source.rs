//! Loading war records from a data directory laid out as `wars/<id>.json`.

use std::path::PathBuf;

use tracing::debug;

use crate::error::CoreError;
use crate::selection::WarId;
use crate::types::WarEntry;

/// Reads published war records beneath a data directory.
#[derive(Debug, Clone)]
pub struct WarSource {
    data_dir: PathBuf,
}

impl WarSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Path of the record relative to the data directory, e.g. `wars/12.json`.
    pub fn relative_path(war: WarId) -> String {
        format!("wars/{war}.json")
    }

    /// Absolute location of the record for `war`.
    pub fn path(&self, war: WarId) -> PathBuf {
        self.data_dir.join("wars").join(format!("{war}.json"))
    }

    /// Reads and parses the record for `war`. Blocking.
    ///
    /// # Errors
    ///
    /// [`CoreError::Io`] when the file cannot be read, [`CoreError::Json`]
    /// when it does not hold a war record.
    pub fn load(&self, war: WarId) -> Result<WarEntry, CoreError> {
        let path = self.path(war);
        let bytes = std::fs::read(&path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entry = parse_war(&bytes, &path.display().to_string())?;
        debug!(
            war = war.get(),
            wardens = entry.warden.len(),
            colonials = entry.colonial.len(),
            "war record loaded"
        );
        Ok(entry)
    }
}

/// Parses a war record; `origin` names the document in errors.
///
/// # Errors
///
/// [`CoreError::Json`] when `bytes` is not a war record.
pub fn parse_war(bytes: &[u8], origin: &str) -> Result<WarEntry, CoreError> {
    serde_json::from_slice(bytes).map_err(|source| CoreError::Json { path: origin.to_owned(), source })
}
