use super::edit::EditAccess;
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Post type used by the page builder for its reusable templates.
pub const TEMPLATE_POST_TYPE: &str = "elementor_library";

/// Edit mode recorded on documents that were built with the page builder.
pub const BUILDER_EDIT_MODE: &str = "builder";

/// Unique identifier of a document within the corpus.
///
/// Stores accept both numeric and string ids; both end up as the same textual key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = DocumentId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a document id (string or integer)")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DocumentId, E> {
                Ok(DocumentId::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<DocumentId, E> {
                Ok(DocumentId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<DocumentId, E> {
                Ok(DocumentId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<DocumentId, E> {
                Ok(DocumentId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// The serialized element tree as stored on a document.
///
/// Most stores keep the tree as a JSON string; exports sometimes inline it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTree {
    Serialized(String),
    Inline(serde_json::Value),
}

impl RawTree {
    /// Textual form of the tree, used for coarse marker matching.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawTree::Serialized(s) => Cow::Borrowed(s),
            RawTree::Inline(v) => Cow::Owned(v.to_string()),
        }
    }
}

fn default_post_type() -> String {
    "post".to_string()
}

fn default_status() -> String {
    "publish".to_string()
}

/// One unit of the corpus as returned by a document source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_mode: Option<String>,
    #[serde(
        default,
        alias = "elementor_data",
        alias = "_elementor_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_tree: Option<RawTree>,
}

impl DocumentRecord {
    pub fn new(id: impl Into<DocumentId>, raw_tree: Option<RawTree>) -> Self {
        Self {
            id: id.into(),
            post_type: default_post_type(),
            title: String::new(),
            status: default_status(),
            edit_mode: None,
            raw_tree,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == "publish"
    }

    pub fn is_template(&self) -> bool {
        self.post_type == TEMPLATE_POST_TYPE
    }

    pub fn is_built_with_builder(&self) -> bool {
        self.edit_mode.as_deref() == Some(BUILDER_EDIT_MODE)
    }
}

/// Presentation metadata attached verbatim to every usage entry of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentMeta {
    pub type_label: String,
    pub title: String,
    pub status_label: String,
    pub published: bool,
    pub edit: EditAccess,
}

impl DocumentMeta {
    /// Best-effort metadata built from the record alone, used when resolution fails.
    pub fn fallback(record: &DocumentRecord) -> Self {
        Self {
            type_label: record.post_type.clone(),
            title: record.title.clone(),
            status_label: record.status.clone(),
            published: record.is_published(),
            edit: EditAccess::unresolved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_numeric_id_and_builder_alias() {
        let json = r#"{"id": 42, "title": "Home", "_elementor_data": "[]"}"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, DocumentId::from(42));
        assert_eq!(record.post_type, "post");
        assert!(record.is_published());
        assert_eq!(record.raw_tree, Some(RawTree::Serialized("[]".to_string())));
    }

    #[test]
    fn test_record_accepts_inline_tree() {
        let json = r#"{"id": "home", "raw_tree": [{"elType": "widget"}]}"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_str(), "home");
        assert!(matches!(record.raw_tree, Some(RawTree::Inline(_))));
    }
}
