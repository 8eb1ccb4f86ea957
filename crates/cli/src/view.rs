use tabled::Tabled;
use widgetscope_api::{DocumentId, EditAccess, NotEditableReason, UsageEntry, WidgetSummary, WidgetUsageIndex};
use widgetscope_core::WidgetscopeConfig;

/// One (widget, document) line of the usage report
#[derive(Tabled)]
pub struct UsageRow {
    #[tabled(rename = "Widget")]
    pub widget: String,
    #[tabled(rename = "Document")]
    pub document: String,
    #[tabled(rename = "Type")]
    pub type_label: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Uses")]
    pub count: usize,
    #[tabled(rename = "Edit")]
    pub edit: String,
}

#[derive(Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Widget")]
    pub widget: String,
    #[tabled(rename = "Documents")]
    pub documents: usize,
    #[tabled(rename = "Total uses")]
    pub total_uses: usize,
}

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Document")]
    pub document: String,
    #[tabled(rename = "Widget")]
    pub widget: String,
    #[tabled(rename = "Uses")]
    pub count: usize,
}

/// Display name of a widget type. Types missing from a configured catalog
/// keep their raw name, marked as unregistered.
pub fn widget_label(config: &WidgetscopeConfig, widget_type: &str) -> String {
    match config.widget_title(widget_type) {
        Some(title) => title.to_string(),
        None if config.widget_titles.is_empty() => widget_type.to_string(),
        None => format!("{} (unregistered)", widget_type),
    }
}

pub fn edit_label(edit: &EditAccess) -> String {
    match edit {
        EditAccess::Builder { url } | EditAccess::GenericEditor { url } => url.clone(),
        EditAccess::NotEditable { reason } => match reason {
            NotEditableReason::PermissionDenied => "no permission".to_string(),
            NotEditableReason::NoEditor => "-".to_string(),
            NotEditableReason::Unresolved => "unknown".to_string(),
        },
    }
}

fn document_label(id: &DocumentId, entry: &UsageEntry) -> String {
    let title = &entry.metadata.title;
    if entry.metadata.published {
        format!("{} (#{})", title, id)
    } else {
        format!("{} (#{}, unpublished)", title, id)
    }
}

pub fn usage_rows(config: &WidgetscopeConfig, index: &WidgetUsageIndex) -> Vec<UsageRow> {
    index
        .iter()
        .flat_map(|(widget_type, docs)| {
            let widget = widget_label(config, widget_type);
            docs.iter().map(move |(id, entry)| UsageRow {
                widget: widget.clone(),
                document: document_label(id, entry),
                type_label: entry.metadata.type_label.clone(),
                status: entry.metadata.status_label.clone(),
                count: entry.count,
                edit: edit_label(&entry.metadata.edit),
            })
        })
        .collect()
}

pub fn summary_rows(config: &WidgetscopeConfig, summaries: Vec<WidgetSummary>) -> Vec<SummaryRow> {
    summaries
        .into_iter()
        .map(|s| SummaryRow {
            widget: widget_label(config, &s.widget_type),
            documents: s.documents,
            total_uses: s.total_uses,
        })
        .collect()
}
