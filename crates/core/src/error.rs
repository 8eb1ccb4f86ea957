use thiserror::Error;
use widgetscope_api::ApiError;

#[derive(Error, Debug)]
pub enum WidgetscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Document source error: {0}")]
    Source(#[from] ApiError),
    #[error("Indexing cancelled after {processed} documents")]
    Cancelled { processed: usize },
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WidgetscopeError>;
