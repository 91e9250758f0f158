use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};
use snippetbox_core::config::SnippetboxConfig;
use snippetbox_models::SnippetStore;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::http::{health, snippets};
use crate::render::TemplateCache;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
///
/// Read-only after startup; the store synchronises its own connection.
pub struct AppState {
    pub config: SnippetboxConfig,
    pub snippets: SnippetStore,
    pub templates: TemplateCache,
}

impl AppState {
    pub fn new(config: SnippetboxConfig, snippets: SnippetStore, templates: TemplateCache) -> Self {
        Self {
            config,
            snippets,
            templates,
        }
    }
}

/// Assemble the full Axum router.
///
/// Layer order, outermost first: trace span → common headers → routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.ui.static_dir);

    Router::new()
        .route("/", get(snippets::home))
        .route("/snippet/view/{id}", get(snippets::snippet_view))
        .route(
            "/snippet/create",
            get(snippets::snippet_create).post(snippets::snippet_create_post),
        )
        .route("/health", get(health::health_handler))
        .nest_service("/static", static_files)
        .fallback(snippets::not_found)
        .with_state(state)
        .layer(middleware::from_fn(crate::middleware::common_headers))
        .layer(TraceLayer::new_for_http().make_span_with(crate::middleware::request_span))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use rusqlite::Connection;
    use tower::ServiceExt;

    use super::*;

    const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    fn test_config() -> SnippetboxConfig {
        let mut config = SnippetboxConfig::default();
        config.ui.templates_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/html").to_string();
        config.ui.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/static").to_string();
        config
    }

    fn app_with(conn: Connection) -> Router {
        let config = test_config();
        let templates = TemplateCache::load(&config.ui.templates_dir).expect("templates");
        let store = SnippetStore::new(Arc::new(Mutex::new(conn)));
        build_router(Arc::new(AppState::new(config, store, templates)))
    }

    fn app() -> Router {
        let conn = Connection::open_in_memory().expect("open db");
        snippetbox_models::db::init_db(&conn).expect("init db");
        app_with(conn)
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.expect("infallible")
    }

    async fn get(app: &Router, uri: &str) -> Response {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(app: &Router, body: &str) -> Response {
        let req = Request::post("/snippet/create")
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, req).await
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn home_without_snippets() {
        let app = app();
        let resp = get(&app, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("nothing to see here"));
    }

    #[tokio::test]
    async fn responses_carry_common_headers() {
        let app = app();
        let resp = get(&app, "/").await;
        let headers = resp.headers();
        assert_eq!(headers[header::X_FRAME_OPTIONS], "deny");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_XSS_PROTECTION], "0");
        assert_eq!(headers[header::REFERRER_POLICY], "origin-when-cross-origin");
        assert_eq!(headers[header::SERVER], "snippetbox");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));

        // also on errors
        let resp = get(&app, "/no/such/page").await;
        assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "deny");
    }

    #[tokio::test]
    async fn create_then_view() {
        let app = app();
        let resp = post_form(
            &app,
            "title=0+snail&content=O+snail%0AClimb+Mount+Fuji%2C%0ABut+slowly%2C+slowly%21&expires_at=7",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/snippet/view/1");

        let resp = get(&app, "/snippet/view/1").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("0 snail"));
        assert!(html.contains("Climb Mount Fuji"));

        let html = body_text(get(&app, "/").await).await;
        assert!(html.contains("0 snail"));
        assert!(html.contains("#1"));
    }

    #[tokio::test]
    async fn blank_title_rerenders_form_without_insert() {
        let app = app();
        let resp = post_form(&app, "title=&content=body+text&expires_at=7").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(resp).await;
        assert!(html.contains("This field cannot be blank"));
        // submitted content is kept
        assert!(html.contains("body text"));

        let resp = get(&app, "/snippet/view/1").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn every_field_error_is_shown() {
        let app = app();
        let resp = post_form(&app, "title=&content=&expires_at=2").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(resp).await;
        assert_eq!(html.matches("This field cannot be blank").count(), 2);
        assert!(html.contains("This field must equal 1, 7 or 365"));
    }

    #[tokio::test]
    async fn non_numeric_expiry_is_bad_request() {
        let app = app();
        let resp = post_form(&app, "title=t&content=c&expires_at=soon").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Bad Request");
    }

    #[tokio::test]
    async fn create_form_renders() {
        let app = app();
        let resp = get(&app, "/snippet/create").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("name='title'"));
        assert!(html.contains("value='365' checked"));
    }

    #[tokio::test]
    async fn invalid_or_unknown_ids_are_404() {
        let app = app();
        for uri in ["/snippet/view/abc", "/snippet/view/0", "/snippet/view/-3", "/snippet/view/99"] {
            let resp = get(&app, uri).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body_text(resp).await, "Not Found");
        }
    }

    #[tokio::test]
    async fn storage_failure_is_generic_500() {
        // no schema: every query fails
        let app = app_with(Connection::open_in_memory().unwrap());

        let resp = get(&app, "/").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert_eq!(body, "Internal Server Error");

        let resp = get(&app, "/snippet/view/1").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn serves_static_files() {
        let app = app();
        let resp = get(&app, "/static/css/main.css").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("font-family"));

        let resp = get(&app, "/static/css/missing.css").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app();
        let resp = get(&app, "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["git_sha"], env!("SNIPPETBOX_GIT_SHA"));
        assert!(!json["git_sha"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let app = app();
        let req = Request::delete("/snippet/create").body(Body::empty()).unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
