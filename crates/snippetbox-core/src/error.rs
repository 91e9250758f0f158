use thiserror::Error;

/// Startup and wiring failures. Request-time errors live in the web layer
/// and the model layer has its own `ModelError`.
#[derive(Debug, Error)]
pub enum SnippetboxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnippetboxError {
    /// Short machine-readable code, used as a log field.
    pub fn code(&self) -> &'static str {
        match self {
            SnippetboxError::Config(_) => "CONFIG_ERROR",
            SnippetboxError::Database(_) => "DATABASE_ERROR",
            SnippetboxError::Template(_) => "TEMPLATE_ERROR",
            SnippetboxError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, SnippetboxError>;
