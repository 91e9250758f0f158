pub mod health;
pub mod snippets;
