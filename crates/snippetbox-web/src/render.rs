use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use snippetbox_core::SnippetboxError;
use snippetbox_models::Snippet;
use tera::{Context, Tera, Value};

use crate::error::{error_chain, WebError};
use crate::forms::SnippetCreateForm;

/// Page templates live under `pages/` inside the templates dir.
const PAGES_PREFIX: &str = "pages/";

/// Data handed to every page. Fields a page does not use stay empty.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<SnippetCreateForm>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
            ..Default::default()
        }
    }
}

/// All templates parsed once at startup.
pub struct TemplateCache {
    tera: Tera,
}

impl TemplateCache {
    /// Parse every `*.html` file under `dir`. Fails fast on a syntax error or
    /// a broken `extends`/`include`, so a bad template never reaches a request.
    pub fn load(dir: &str) -> Result<Self, SnippetboxError> {
        let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let mut tera = Tera::new(&glob).map_err(|e| SnippetboxError::Template(error_chain(&e)))?;
        tera.register_filter("human_date", human_date_filter);

        if !tera.get_template_names().any(|name| name.starts_with(PAGES_PREFIX)) {
            return Err(SnippetboxError::Template(format!(
                "no page templates found under {dir}/{PAGES_PREFIX}"
            )));
        }
        Ok(Self { tera })
    }

    /// Number of parsed templates (pages, layouts and partials).
    pub fn len(&self) -> usize {
        self.tera.get_template_names().count()
    }

    /// Render `page` (e.g. `"home.html"`) to a string.
    pub fn render(&self, page: &str, data: &TemplateData) -> Result<String, WebError> {
        let name = format!("{PAGES_PREFIX}{page}");
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(WebError::Internal(format!("the template {page} does not exist")));
        }
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(&name, &context)?)
    }

    /// Render into a buffer first and only then attach `status`, so a
    /// template failure turns into a clean 500 instead of a half-sent page.
    pub fn page(&self, status: StatusCode, page: &str, data: &TemplateData) -> Result<Response, WebError> {
        let body = self.render(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}

/// `02 Jan 2026 at 15:04`, always UTC.
pub fn human_date(ts: DateTime<Utc>) -> String {
    ts.format("%d %b %Y at %H:%M").to_string()
}

/// Tera filter wrapper: timestamps reach templates as RFC 3339 strings.
fn human_date_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects an RFC 3339 string"))?;
    let ts = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date: {e}")))?;
    Ok(Value::String(human_date(ts.with_timezone(&Utc))))
}
