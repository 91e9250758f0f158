use std::collections::HashMap;

use serde::Serialize;

/// Accumulates per-field validation failures.
///
/// Serialises as `{ "field_errors": { ... } }` so templates can render the
/// message next to the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    pub field_errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no check has failed.
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// Record `message` for `key` unless the field already has one.
    pub fn add_field_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(key.into())
            .or_insert_with(|| message.into());
    }

    /// Record `message` for `key` if `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.add_field_error(key, message);
        }
    }
}
