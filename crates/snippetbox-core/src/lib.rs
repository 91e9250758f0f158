pub mod config;
pub mod error;

pub use config::SnippetboxConfig;
pub use error::{Result, SnippetboxError};
