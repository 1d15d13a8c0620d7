use thiserror::Error;

/// Errors surfaced by warstats-core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A virtual list was configured with a zero item height.
    #[error("item height must be greater than zero")]
    InvalidItemHeight,
    /// Reading a war record from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A war record was not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A SQLite statement failed.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// The background SQLite connection failed or was closed.
    #[error(transparent)]
    Db(#[from] tokio_rusqlite::Error),
}
