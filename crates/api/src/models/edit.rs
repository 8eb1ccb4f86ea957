use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What an editor reports for a single document: a link, if one applies,
/// and whether the current user may follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLink {
    pub url: Option<String>,
    pub editable: bool,
}

impl EditLink {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn editable(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            editable: true,
        }
    }

    pub fn forbidden(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            editable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotEditableReason {
    /// An editor applies to the document but the current user may not use it.
    PermissionDenied,
    /// No editor applies to the document.
    NoEditor,
    /// Edit capabilities could not be determined.
    Unresolved,
}

/// Resolved edit affordance for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditAccess {
    Builder { url: String },
    GenericEditor { url: String },
    NotEditable { reason: NotEditableReason },
}

impl EditAccess {
    pub fn unresolved() -> Self {
        EditAccess::NotEditable {
            reason: NotEditableReason::Unresolved,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            EditAccess::Builder { url } | EditAccess::GenericEditor { url } => Some(url),
            EditAccess::NotEditable { .. } => None,
        }
    }
}
