use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snippetbox_models::ModelError;
use thiserror::Error;
use tracing::error;

/// Request-level failures, mapped to status codes in `into_response`.
///
/// The client only ever sees the status text. Internal causes are logged
/// inside the request span, which carries method, URI and request id.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            WebError::Internal(cause) => error!(error = %cause, "server error"),
            WebError::BadRequest(reason) => tracing::debug!(reason = %reason, "client error"),
            WebError::NotFound => {}
        }
        let text = status.canonical_reason().unwrap_or("Error");
        (status, text).into_response()
    }
}

impl From<ModelError> for WebError {
    fn from(e: ModelError) -> Self {
        if e.is_not_found() {
            WebError::NotFound
        } else {
            WebError::Internal(e.to_string())
        }
    }
}

impl From<tera::Error> for WebError {
    fn from(e: tera::Error) -> Self {
        WebError::Internal(error_chain(&e))
    }
}

/// Tera's top-level message is terse ("Failed to render 'x'"); the useful
/// part is further down the source chain.
pub(crate) fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
