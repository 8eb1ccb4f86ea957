pub mod error;
pub mod metadata;
pub mod models;
pub mod source;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use metadata::{EditCapabilities, MetadataResolver};
pub use models::*;
pub use source::{DEFAULT_WIDGET_MARKER, DocumentQuery, DocumentSource, DocumentStream};
