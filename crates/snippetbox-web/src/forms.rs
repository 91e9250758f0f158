use serde::{Deserialize, Serialize};
use snippetbox_validator::{max_chars, not_blank, permitted_value, Validator};

use crate::error::WebError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const PERMITTED_EXPIRY_DAYS: [i64; 3] = [1, 7, 365];
/// Preselected expiry on a fresh create form.
pub const DEFAULT_EXPIRY_DAYS: i64 = 365;

/// Raw urlencoded body of `POST /snippet/create`.
///
/// Everything arrives as text; `expires_at` is parsed separately so a
/// non-numeric value can be answered with 400 rather than a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SnippetCreateInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires_at: String,
}

/// The create form: submitted values plus their validation state.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    /// Days until expiry.
    pub expires_at: i64,
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires_at: DEFAULT_EXPIRY_DAYS,
            validator: Validator::new(),
        }
    }
}

impl SnippetCreateForm {
    /// Build the form from the raw body. Only a non-integer `expires_at`
    /// is rejected here; everything else is left to `validate`.
    pub fn parse(input: SnippetCreateInput) -> Result<Self, WebError> {
        let expires_at = input
            .expires_at
            .trim()
            .parse::<i64>()
            .map_err(|e| WebError::BadRequest(format!("expires_at: {e}")))?;

        Ok(Self {
            title: input.title,
            content: input.content,
            expires_at,
            validator: Validator::new(),
        })
    }

    /// Run every field check. No short-circuiting: all errors are collected.
    pub fn validate(&mut self) {
        self.validator.check_field(
            not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        self.validator.check_field(
            max_chars(&self.title, TITLE_MAX_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        self.validator.check_field(
            not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        self.validator.check_field(
            permitted_value(&self.expires_at, &PERMITTED_EXPIRY_DAYS),
            "expires_at",
            "This field must equal 1, 7 or 365",
        );
    }

    pub fn valid(&self) -> bool {
        self.validator.valid()
    }
}
