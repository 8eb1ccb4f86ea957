use super::document::{DocumentId, DocumentMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Widget type name to occurrence count, for one tree or subtree.
pub type WidgetCounts = BTreeMap<String, usize>;

/// One (widget type, document) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UsageEntry {
    pub count: usize,
    pub metadata: DocumentMeta,
}

/// Aggregate of one widget type across the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WidgetSummary {
    pub widget_type: String,
    pub documents: usize,
    pub total_uses: usize,
}

/// Widget type to the documents using it.
///
/// Immutable once built; use [`UsageIndexBuilder`] to assemble one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WidgetUsageIndex {
    widgets: BTreeMap<String, BTreeMap<DocumentId, UsageEntry>>,
}

impl WidgetUsageIndex {
    pub fn builder() -> UsageIndexBuilder {
        UsageIndexBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widget_types(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    pub fn documents_for(&self, widget_type: &str) -> Option<&BTreeMap<DocumentId, UsageEntry>> {
        self.widgets.get(widget_type)
    }

    pub fn entry(&self, widget_type: &str, id: &DocumentId) -> Option<&UsageEntry> {
        self.widgets.get(widget_type)?.get(id)
    }

    pub fn total_uses(&self, widget_type: &str) -> usize {
        self.widgets
            .get(widget_type)
            .map(|docs| docs.values().map(|e| e.count).sum())
            .unwrap_or(0)
    }

    /// Number of distinct documents contributing at least one widget.
    pub fn document_count(&self) -> usize {
        let mut ids: Vec<&DocumentId> = self.widgets.values().flat_map(|docs| docs.keys()).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }

    pub fn summaries(&self) -> Vec<WidgetSummary> {
        self.widgets
            .iter()
            .map(|(widget_type, docs)| WidgetSummary {
                widget_type: widget_type.clone(),
                documents: docs.len(),
                total_uses: docs.values().map(|e| e.count).sum(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<DocumentId, UsageEntry>)> {
        self.widgets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Accumulates per-document counts into a [`WidgetUsageIndex`].
#[derive(Debug, Default)]
pub struct UsageIndexBuilder {
    widgets: BTreeMap<String, BTreeMap<DocumentId, UsageEntry>>,
}

impl UsageIndexBuilder {
    /// Records one document's counts, overwriting any earlier entry for the
    /// same (widget type, document) pair. Zero counts are ignored.
    pub fn record(&mut self, id: &DocumentId, counts: &WidgetCounts, metadata: &DocumentMeta) {
        for (widget_type, &count) in counts {
            if count == 0 {
                continue;
            }
            self.widgets.entry(widget_type.clone()).or_default().insert(
                id.clone(),
                UsageEntry {
                    count,
                    metadata: metadata.clone(),
                },
            );
        }
    }

    /// Folds a partial index built elsewhere into this one.
    pub fn merge(&mut self, other: UsageIndexBuilder) {
        for (widget_type, docs) in other.widgets {
            self.widgets.entry(widget_type).or_default().extend(docs);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn finish(self) -> WidgetUsageIndex {
        WidgetUsageIndex {
            widgets: self.widgets,
        }
    }
}
