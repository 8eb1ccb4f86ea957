use crate::ApiResult;
use crate::models::{DocumentMeta, DocumentRecord, EditLink};

/// Resolves the presentation metadata of one document.
///
/// Called once per document; the result is shared by every usage entry of
/// that document.
pub trait MetadataResolver: Send + Sync {
    fn resolve(&self, record: &DocumentRecord) -> ApiResult<DocumentMeta>;
}

/// The editors a host offers for a document.
pub trait EditCapabilities: Send + Sync {
    /// Link into the page builder, when the document was built with it.
    fn builder_link(&self, record: &DocumentRecord) -> ApiResult<EditLink>;

    /// Link into the host's generic post editor.
    fn editor_link(&self, record: &DocumentRecord) -> ApiResult<EditLink>;
}
