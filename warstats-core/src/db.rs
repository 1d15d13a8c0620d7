//! SQLite store for state that outlives a run: the last selector location.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::CoreError;

/// Opens (or creates) the database at `path`, configures WAL mode, and
/// applies schema migrations.
///
/// # Errors
///
/// Returns [`CoreError`] if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, CoreError> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        crate::schema::migrate(db)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    debug!(path, "state database opened");
    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// The stored location query, or `None` if nothing was saved yet.
///
/// # Errors
///
/// Returns [`CoreError`] if the query fails.
pub async fn load_location(conn: &Connection) -> Result<Option<String>, CoreError> {
    let query = conn
        .call(|db| {
            db.query_row("SELECT query FROM location WHERE id = 1", [], |r| r.get::<_, String>(0))
                .optional()
        })
        .await?;
    Ok(query)
}

/// Replaces the stored location query.
///
/// # Errors
///
/// Returns [`CoreError`] if the upsert transaction fails.
pub async fn save_location(conn: &Connection, query: &str) -> Result<(), CoreError> {
    let query = query.to_owned();

    conn.call(move |db| {
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO location (id, query, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET query = excluded.query,
                                           updated_at = excluded.updated_at",
            rusqlite::params![&query, now],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;
    Ok(())
}
