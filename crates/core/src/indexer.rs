use crate::counter::TreeCounter;
use crate::error::{Result, WidgetscopeError};
use crate::tree;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use widgetscope_api::{
    DocumentMeta, DocumentQuery, DocumentRecord, DocumentSource, MetadataResolver,
    UsageIndexBuilder, WidgetUsageIndex,
};

/// Bookkeeping for one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Documents received from the source.
    pub scanned: usize,
    /// Documents that contributed at least one widget.
    pub with_widgets: usize,
    /// Documents whose tree could not be decoded.
    pub unparsable: usize,
    /// Documents indexed with fallback metadata.
    pub metadata_failures: usize,
}

impl IndexStats {
    fn merge(self, other: IndexStats) -> IndexStats {
        IndexStats {
            scanned: self.scanned + other.scanned,
            with_widgets: self.with_widgets + other.with_widgets,
            unparsable: self.unparsable + other.unparsable,
            metadata_failures: self.metadata_failures + other.metadata_failures,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexReport {
    pub index: WidgetUsageIndex,
    pub stats: IndexStats,
}

/// Folds per-document widget counts into a [`WidgetUsageIndex`].
pub struct CorpusIndexer {
    resolver: Arc<dyn MetadataResolver>,
    parallel: bool,
}

impl CorpusIndexer {
    pub fn new(resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            resolver,
            parallel: false,
        }
    }

    /// Spreads documents over the rayon pool. Workers build partial indexes
    /// that are merged once all documents are done.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Indexes the given documents. Never fails: undecodable trees count as
    /// empty and unresolvable metadata falls back to the record's own fields.
    pub fn build<I>(&self, documents: I) -> WidgetUsageIndex
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        self.build_report(documents).index
    }

    pub fn build_report<I>(&self, documents: I) -> IndexReport
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        self.run(documents, None).0
    }

    /// Indexes the given documents, checking `cancel` between documents.
    pub fn build_cancellable<I>(&self, documents: I, cancel: &CancellationToken) -> Result<IndexReport>
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let (report, cancelled) = self.run(documents, Some(cancel));
        if cancelled {
            return Err(WidgetscopeError::Cancelled {
                processed: report.stats.scanned,
            });
        }
        Ok(report)
    }

    /// Queries `source` and indexes everything it returns. The query's
    /// stream is released before this returns, on success or failure.
    pub fn index_source(
        &self,
        source: &dyn DocumentSource,
        query: &DocumentQuery,
        cancel: &CancellationToken,
    ) -> Result<IndexReport> {
        let stream = source.query(query)?;
        let report = self.build_cancellable(stream, cancel)?;

        tracing::info!(
            scanned = report.stats.scanned,
            with_widgets = report.stats.with_widgets,
            unparsable = report.stats.unparsable,
            metadata_failures = report.stats.metadata_failures,
            widget_types = report.index.len(),
            "Indexing complete"
        );
        Ok(report)
    }

    /// Returns the report and whether `cancel` left any document unindexed.
    /// A cancellation arriving after the last document has no effect.
    fn run<I>(&self, documents: I, cancel: Option<&CancellationToken>) -> (IndexReport, bool)
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);

        let (builder, stats, skipped) = if self.parallel {
            let documents: Vec<DocumentRecord> = documents.into_iter().collect();
            documents
                .par_iter()
                .fold(
                    || (UsageIndexBuilder::default(), IndexStats::default(), false),
                    |(mut builder, mut stats, mut skipped), record| {
                        if is_cancelled() {
                            skipped = true;
                        } else {
                            self.index_document(record, &mut builder, &mut stats);
                        }
                        (builder, stats, skipped)
                    },
                )
                .reduce(
                    || (UsageIndexBuilder::default(), IndexStats::default(), false),
                    |(mut left, left_stats, left_skipped), (right, right_stats, right_skipped)| {
                        left.merge(right);
                        (left, left_stats.merge(right_stats), left_skipped || right_skipped)
                    },
                )
        } else {
            let mut builder = UsageIndexBuilder::default();
            let mut stats = IndexStats::default();
            let mut skipped = false;
            for record in documents {
                if is_cancelled() {
                    skipped = true;
                    break;
                }
                self.index_document(&record, &mut builder, &mut stats);
            }
            (builder, stats, skipped)
        };

        let report = IndexReport {
            index: builder.finish(),
            stats,
        };
        (report, skipped)
    }

    fn index_document(
        &self,
        record: &DocumentRecord,
        builder: &mut UsageIndexBuilder,
        stats: &mut IndexStats,
    ) {
        stats.scanned += 1;

        let nodes = match tree::parse_record(record) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::debug!("Treating tree of document {} as empty: {}", record.id, e);
                stats.unparsable += 1;
                return;
            }
        };

        let counts = TreeCounter::count(&nodes);
        if counts.is_empty() {
            return;
        }

        // Resolved once per document and shared by all of its entries.
        let metadata = self.resolver.resolve(record).unwrap_or_else(|e| {
            tracing::warn!("Using fallback metadata for document {}: {}", record.id, e);
            stats.metadata_failures += 1;
            DocumentMeta::fallback(record)
        });

        builder.record(&record.id, &counts, &metadata);
        stats.with_widgets += 1;
    }
}
