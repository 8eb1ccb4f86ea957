#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Document source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Metadata unavailable for document {id}: {reason}")]
    MetadataUnavailable { id: String, reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
