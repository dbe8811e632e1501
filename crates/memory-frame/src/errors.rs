//! Error types for the in-memory frame

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    /// Selector syntax the engine does not understand
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),

    /// Fixture document that cannot be parsed
    #[error("invalid page fixture: {0}")]
    Fixture(#[from] serde_yaml::Error),

    #[error("failed to read page fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
