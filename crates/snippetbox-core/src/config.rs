use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_DB_PATH: &str = "snippetbox.db";
pub const DEFAULT_TEMPLATES_DIR: &str = "ui/html";
pub const DEFAULT_STATIC_DIR: &str = "ui/static";
pub const DEFAULT_CONFIG_FILE: &str = "snippetbox.toml";
/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SNIPPETBOX_CONFIG";

/// Top-level config (snippetbox.toml + SNIPPETBOX_* env overrides).
///
/// Every section has defaults, so an absent config file still yields a
/// runnable setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetboxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path. `:memory:` is accepted for throwaway runs.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Where the HTML templates and static assets live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}
fn default_templates_dir() -> String {
    DEFAULT_TEMPLATES_DIR.to_string()
}
fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

impl SnippetboxConfig {
    /// Load config from a TOML file with SNIPPETBOX_* env var overrides.
    ///
    /// Path resolution:
    ///   1. Explicit path argument
    ///   2. `$SNIPPETBOX_CONFIG`
    ///   3. `./snippetbox.toml`
    ///
    /// A missing file is not an error; defaults fill every field. Nested keys
    /// use a double underscore in env names, e.g. `SNIPPETBOX_SERVER__PORT`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        tracing::debug!(path = %path, "loading config");

        Figment::from(Serialized::defaults(SnippetboxConfig::default()))
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SNIPPETBOX_").ignore(&["CONFIG"]).split("__"))
            .extract()
            .map_err(|e| crate::error::SnippetboxError::Config(e.to_string()))
    }

    /// `bind:port` as a string, ready for `SocketAddr` parsing.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
