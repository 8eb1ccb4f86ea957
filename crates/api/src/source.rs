use crate::ApiResult;
use crate::models::DocumentRecord;

/// Pattern matching the widget-kind marker inside a serialized tree.
pub const DEFAULT_WIDGET_MARKER: &str = r#""elType"\s*:\s*"widget""#;

/// Documents yielded by a source for one query. Dropping the stream releases
/// whatever the source acquired for it.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = DocumentRecord> + 'a>;

/// Filter handed to a document source.
///
/// The marker filter is coarse: sources may return documents that hold no
/// widgets at all, so consumers still walk every tree they receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Regex the serialized tree must match. `None` disables the filter.
    pub marker: Option<String>,
    /// Allowed post types; empty means any.
    pub post_types: Vec<String>,
    /// Allowed statuses; empty means any.
    pub statuses: Vec<String>,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            marker: Some(DEFAULT_WIDGET_MARKER.to_string()),
            post_types: Vec::new(),
            statuses: Vec::new(),
        }
    }
}

impl DocumentQuery {
    pub fn allows(&self, record: &DocumentRecord) -> bool {
        (self.post_types.is_empty() || self.post_types.iter().any(|t| *t == record.post_type))
            && (self.statuses.is_empty() || self.statuses.iter().any(|s| *s == record.status))
    }
}

pub trait DocumentSource: Send + Sync {
    /// Runs a query against the store.
    fn query<'a>(&'a self, query: &DocumentQuery) -> ApiResult<DocumentStream<'a>>;

    /// Identifies the current state of the corpus, if the source can tell.
    fn fingerprint(&self) -> ApiResult<Option<u64>> {
        Ok(None)
    }
}

/// In-memory corpus. Only the post type and status filters apply.
impl DocumentSource for Vec<DocumentRecord> {
    fn query<'a>(&'a self, query: &DocumentQuery) -> ApiResult<DocumentStream<'a>> {
        let query = query.clone();
        Ok(Box::new(
            self.iter().filter(move |r| query.allows(r)).cloned(),
        ))
    }
}
