//! `snippetbox-validator` — field-level form validation.
//!
//! A [`Validator`] collects one message per failing field. Forms hold it as
//! a named field and run every check, so a single re-render can show all
//! problems at once. The [`rules`] predicates are pure and reusable.

pub mod rules;
pub mod validator;

pub use rules::{max_chars, not_blank, permitted_value};
pub use validator::Validator;
