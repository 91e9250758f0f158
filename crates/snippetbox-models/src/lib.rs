//! `snippetbox-models` — SQLite-backed snippet storage.
//!
//! [`db::init_db`] creates the schema; [`SnippetStore`] runs the three
//! statements the web layer needs (insert, get-by-id, latest). Validation is
//! the caller's job; the store trusts its input.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{ModelError, Result};
pub use store::{SnippetStore, LATEST_LIMIT};
pub use types::Snippet;
