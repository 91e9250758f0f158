use thiserror::Error;

/// Errors from the snippet store.
///
/// `NotFound` covers both "no such id" and "expired". The other variants
/// are storage failures.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No live (existing and unexpired) snippet with this id.
    #[error("snippet not found: {id}")]
    NotFound { id: i64 },

    /// The requested expiry cannot be stored: it overflows the clock or
    /// lands past year 9999.
    #[error("expiry of {days} days is out of storable range")]
    ExpiryOutOfRange { days: i64 },

    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ModelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
