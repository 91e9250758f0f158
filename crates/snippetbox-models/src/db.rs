use rusqlite::{Connection, Result};

/// Initialise the snippets table and its index.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout.
pub fn init_db(conn: &Connection) -> Result<()> {
    // Timestamps are fixed-width RFC 3339 UTC text, so text comparison
    // matches chronological order.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS snippets (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            expires_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_snippets_created
            ON snippets(created_at DESC);",
    )
}
