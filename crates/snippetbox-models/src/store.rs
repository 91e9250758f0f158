use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{SubsecRound, TimeDelta, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::error::{ModelError, Result};
use crate::types::{is_storable, row_to_snippet, to_db_timestamp, Snippet};

/// Maximum number of snippets returned by [`SnippetStore::latest`].
pub const LATEST_LIMIT: usize = 10;

/// Column order expected by `row_to_snippet`.
const SNIPPET_COLUMNS: &str = "id, title, content, created_at, expires_at";

/// Data access for the `snippets` table.
///
/// The connection handle is shared and injected by the caller; each method
/// holds the lock for exactly one statement, so the store can be used from
/// many request tasks at once.
#[derive(Clone)]
pub struct SnippetStore {
    db: Arc<Mutex<Connection>>,
}

impl SnippetStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection itself usable.
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a snippet expiring `expires_days` days from now. Returns the new id.
    ///
    /// Input is not validated here; the web layer runs the form checks first.
    /// A day count whose expiry cannot be represented in the `expires_at`
    /// column fails with [`ModelError::ExpiryOutOfRange`] and writes nothing.
    #[instrument(skip(self, content), fields(title_len = title.len()))]
    pub fn insert(&self, title: &str, content: &str, expires_days: i64) -> Result<i64> {
        let created_at = Utc::now().trunc_subsecs(6);
        let expires_at = TimeDelta::try_days(expires_days)
            .and_then(|delta| created_at.checked_add_signed(delta))
            .filter(|ts| is_storable(*ts))
            .ok_or(ModelError::ExpiryOutOfRange { days: expires_days })?;

        let db = self.conn();
        db.execute(
            "INSERT INTO snippets (title, content, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                title,
                content,
                to_db_timestamp(created_at),
                to_db_timestamp(expires_at)
            ],
        )?;
        let id = db.last_insert_rowid();

        debug!(id, "snippet inserted");
        Ok(id)
    }

    /// Fetch a snippet by id, provided it has not expired.
    ///
    /// Missing and expired rows both yield [`ModelError::NotFound`].
    #[instrument(skip(self))]
    pub fn get(&self, id: i64) -> Result<Snippet> {
        let now = to_db_timestamp(Utc::now());
        let db = self.conn();
        match db.query_row(
            &format!("SELECT {SNIPPET_COLUMNS} FROM snippets WHERE expires_at > ?1 AND id = ?2"),
            rusqlite::params![now, id],
            row_to_snippet,
        ) {
            Ok(snippet) => Ok(snippet),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(ModelError::NotFound { id }),
            Err(e) => Err(ModelError::Database(e)),
        }
    }

    /// The most recently created unexpired snippets, newest first.
    ///
    /// At most [`LATEST_LIMIT`] rows; an empty vec when none qualify.
    #[instrument(skip(self))]
    pub fn latest(&self) -> Result<Vec<Snippet>> {
        let now = to_db_timestamp(Utc::now());
        let db = self.conn();
        let mut stmt = db.prepare(&format!(
            "SELECT {SNIPPET_COLUMNS} FROM snippets
             WHERE expires_at > ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(rusqlite::params![now, LATEST_LIMIT as i64], row_to_snippet)?;
        let snippets = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(snippets)
    }
}
