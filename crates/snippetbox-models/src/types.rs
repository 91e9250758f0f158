use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored snippet. Rows are written once and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Assigned by SQLite on insert; always positive.
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Always later than `created_at`. Expired rows stay in the table but
    /// are no longer returned by the store.
    pub expires_at: DateTime<Utc>,
}

/// Encode a timestamp for storage: `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
///
/// Fixed width, so SQL `<`/`>` on the text column orders by time.
pub(crate) fn to_db_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Largest year whose encoding keeps the four-digit, fixed-width form.
const MAX_STORED_YEAR: i32 = 9999;

/// True if `ts` encodes to the fixed-width form. Years outside 0..=9999
/// gain a sign and extra digits, which breaks text ordering in SQL.
pub(crate) fn is_storable(ts: DateTime<Utc>) -> bool {
    (0..=MAX_STORED_YEAR).contains(&ts.year())
}

/// Decode a stored timestamp. Reported as a conversion failure on `column`
/// so a corrupt row surfaces as a database error rather than a panic.
pub(crate) fn from_db_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Map a SELECT row (column order from `SNIPPET_COLUMNS`) to a Snippet.
pub(crate) fn row_to_snippet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: from_db_timestamp(3, &row.get::<_, String>(3)?)?,
        expires_at: from_db_timestamp(4, &row.get::<_, String>(4)?)?,
    })
}
