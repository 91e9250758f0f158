use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use clap::Parser;
use snippetbox_core::SnippetboxError;
use tracing::{info, warn};

mod app;
mod error;
mod forms;
mod http;
mod middleware;
mod render;

/// Snippetbox web server.
#[derive(Debug, Parser)]
#[command(name = "snippetbox-web", version, about)]
struct Cli {
    /// HTTP network address, e.g. 127.0.0.1:4000 (overrides [server] in the config)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// SQLite database path (overrides [database] path)
    #[arg(long)]
    dsn: Option<String>,

    /// Config file path (default: $SNIPPETBOX_CONFIG, then ./snippetbox.toml)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "snippetbox_web=info,snippetbox_models=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = snippetbox_core::SnippetboxConfig::load(cli.config.as_deref())
        .unwrap_or_else(|e| {
            warn!(code = e.code(), "Config load failed ({}), using defaults", e);
            snippetbox_core::SnippetboxConfig::default()
        });
    if let Some(dsn) = cli.dsn {
        config.database.path = dsn;
    }
    let addr: SocketAddr = match cli.addr {
        Some(addr) => addr,
        None => config.listen_addr().parse()?,
    };

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path)?;
    info!(path = %db_path, "opening SQLite database");
    let conn = open_db(&db_path).inspect_err(|e| warn!(code = e.code(), "{e}"))?;
    info!("database ready");

    let templates = render::TemplateCache::load(&config.ui.templates_dir)?;
    info!(
        dir = %config.ui.templates_dir,
        count = templates.len(),
        "templates loaded"
    );

    let snippets = snippetbox_models::SnippetStore::new(Arc::new(Mutex::new(conn)));
    let state = Arc::new(app::AppState::new(config, snippets, templates));
    let router = app::build_router(state);

    info!("Snippetbox listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Open the database, apply pragmas, run schema init and ping it once so a
/// bad path fails at startup rather than on the first request.
fn open_db(path: &str) -> snippetbox_core::Result<rusqlite::Connection> {
    let db_err = |e: rusqlite::Error| SnippetboxError::Database(format!("{path}: {e}"));
    let conn = rusqlite::Connection::open(path).map_err(db_err)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(db_err)?;
    snippetbox_models::db::init_db(&conn).map_err(db_err)?;
    conn.query_row("SELECT 1", [], |_| Ok(())).map_err(db_err)?;
    Ok(conn)
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) -> snippetbox_core::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
