//! Snippet pages.
//!
//! | Route                      | Handler               |
//! |----------------------------|-----------------------|
//! | `GET /`                    | [`home`]              |
//! | `GET /snippet/view/{id}`   | [`snippet_view`]      |
//! | `GET /snippet/create`      | [`snippet_create`]    |
//! | `POST /snippet/create`     | [`snippet_create_post`] |

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tracing::info;

use crate::app::AppState;
use crate::error::WebError;
use crate::forms::{SnippetCreateForm, SnippetCreateInput};
use crate::render::TemplateData;

/// GET / — the latest snippets.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let snippets = state.snippets.latest()?;

    let mut data = TemplateData::new();
    data.snippets = snippets;
    state.templates.page(StatusCode::OK, "home.html", &data)
}

/// GET /snippet/view/{id} — one snippet. Anything but a positive integer id is a 404.
pub async fn snippet_view(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let id = match raw_id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(WebError::NotFound),
    };

    let snippet = state.snippets.get(id)?;

    let mut data = TemplateData::new();
    data.snippet = Some(snippet);
    state.templates.page(StatusCode::OK, "view.html", &data)
}

/// GET /snippet/create — empty form.
pub async fn snippet_create(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let mut data = TemplateData::new();
    data.form = Some(SnippetCreateForm::default());
    state.templates.page(StatusCode::OK, "create.html", &data)
}

/// POST /snippet/create — validate, insert, redirect.
///
/// An invalid form is re-rendered with 422 and every field error; the
/// store is not touched.
pub async fn snippet_create_post(
    State(state): State<Arc<AppState>>,
    Form(input): Form<SnippetCreateInput>,
) -> Result<Response, WebError> {
    let mut form = SnippetCreateForm::parse(input)?;
    form.validate();

    if !form.valid() {
        let mut data = TemplateData::new();
        data.form = Some(form);
        return state
            .templates
            .page(StatusCode::UNPROCESSABLE_ENTITY, "create.html", &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires_at)?;
    info!(id, expires_days = form.expires_at, "snippet created");

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> WebError {
    WebError::NotFound
}
