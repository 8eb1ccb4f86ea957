//! Presentation metadata for indexed documents: labels, titles and the
//! edit affordance.

use crate::config::WidgetscopeConfig;
use crate::util::humanize_slug;
use std::sync::Arc;
use widgetscope_api::{
    ApiResult, DocumentMeta, DocumentRecord, EditAccess, EditCapabilities, EditLink,
    MetadataResolver, NotEditableReason,
};

pub const TEMPLATE_LABEL: &str = "Template";
pub const UNTITLED: &str = "(no title)";

/// Decides which editor, if any, a document should link to.
///
/// The page builder takes precedence over the generic editor. A document
/// only counts as denied when some editor applies but none may be used.
pub struct EditPolicy;

impl EditPolicy {
    pub fn resolve(caps: &dyn EditCapabilities, record: &DocumentRecord) -> EditAccess {
        let mut denied = false;
        let mut failed = false;

        match caps.builder_link(record) {
            Ok(EditLink {
                url: Some(url),
                editable: true,
            }) => return EditAccess::Builder { url },
            Ok(link) => denied |= link.url.is_some(),
            Err(e) => {
                tracing::warn!("Builder link for document {} unavailable: {}", record.id, e);
                failed = true;
            }
        }

        match caps.editor_link(record) {
            Ok(EditLink {
                url: Some(url),
                editable: true,
            }) => return EditAccess::GenericEditor { url },
            Ok(link) => denied |= link.url.is_some(),
            Err(e) => {
                tracing::warn!("Editor link for document {} unavailable: {}", record.id, e);
                failed = true;
            }
        }

        let reason = if denied {
            NotEditableReason::PermissionDenied
        } else if failed {
            NotEditableReason::Unresolved
        } else {
            NotEditableReason::NoEditor
        };
        EditAccess::NotEditable { reason }
    }
}

/// Edit capabilities derived from URL templates and configured permissions.
#[derive(Debug, Clone)]
pub struct ConfiguredEditor {
    site_url: String,
    builder_url_template: String,
    editor_url_template: String,
    can_use_builder: bool,
    can_edit_posts: bool,
}

impl ConfiguredEditor {
    pub fn from_config(config: &WidgetscopeConfig) -> Self {
        Self {
            site_url: config.site_url.trim_end_matches('/').to_string(),
            builder_url_template: config.builder_url_template.clone(),
            editor_url_template: config.editor_url_template.clone(),
            can_use_builder: config.permissions.edit_with_builder,
            can_edit_posts: config.permissions.edit_posts,
        }
    }

    fn expand(&self, template: &str, record: &DocumentRecord) -> String {
        template
            .replace("{site}", &self.site_url)
            .replace("{id}", record.id.as_str())
    }
}

impl EditCapabilities for ConfiguredEditor {
    fn builder_link(&self, record: &DocumentRecord) -> ApiResult<EditLink> {
        if !record.is_built_with_builder() {
            return Ok(EditLink::none());
        }
        let url = self.expand(&self.builder_url_template, record);
        Ok(if self.can_use_builder {
            EditLink::editable(url)
        } else {
            EditLink::forbidden(url)
        })
    }

    fn editor_link(&self, record: &DocumentRecord) -> ApiResult<EditLink> {
        let url = self.expand(&self.editor_url_template, record);
        Ok(if self.can_edit_posts {
            EditLink::editable(url)
        } else {
            EditLink::forbidden(url)
        })
    }
}

/// Metadata resolver backed by the site configuration.
pub struct SiteMetadataResolver {
    config: Arc<WidgetscopeConfig>,
    caps: Arc<dyn EditCapabilities>,
}

impl SiteMetadataResolver {
    pub fn new(config: Arc<WidgetscopeConfig>, caps: Arc<dyn EditCapabilities>) -> Self {
        Self { config, caps }
    }

    pub fn from_config(config: Arc<WidgetscopeConfig>) -> Self {
        let caps = Arc::new(ConfiguredEditor::from_config(&config));
        Self::new(config, caps)
    }

    pub fn type_label(&self, record: &DocumentRecord) -> String {
        if record.is_template() {
            return TEMPLATE_LABEL.to_string();
        }
        self.config
            .post_type_labels
            .get(&record.post_type)
            .cloned()
            .unwrap_or_else(|| humanize_slug(&record.post_type))
    }

    pub fn status_label(&self, record: &DocumentRecord) -> String {
        self.config
            .status_labels
            .get(&record.status)
            .cloned()
            .unwrap_or_else(|| record.status.clone())
    }
}

impl MetadataResolver for SiteMetadataResolver {
    fn resolve(&self, record: &DocumentRecord) -> ApiResult<DocumentMeta> {
        let title = if record.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            record.title.clone()
        };

        Ok(DocumentMeta {
            type_label: self.type_label(record),
            title,
            status_label: self.status_label(record),
            published: record.is_published(),
            edit: EditPolicy::resolve(self.caps.as_ref(), record),
        })
    }
}
