use crate::cache::{ReportCache, cache_key};
use crate::config::WidgetscopeConfig;
use crate::error::Result;
use crate::indexer::{CorpusIndexer, IndexReport, IndexStats};
use crate::resolver::SiteMetadataResolver;
use crate::scanner::DirectorySource;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use widgetscope_api::{DocumentQuery, DocumentSource, MetadataResolver, WidgetUsageIndex};

/// Outcome of a report request.
#[derive(Debug, Clone)]
pub struct Report {
    pub index: WidgetUsageIndex,
    /// `None` when the index came from the cache.
    pub stats: Option<IndexStats>,
}

impl Report {
    pub fn from_cache(&self) -> bool {
        self.stats.is_none()
    }
}

/// Builds usage reports for directory corpora from a site configuration.
///
/// Every request indexes the corpus afresh unless a cache is attached, in
/// which case a stored report is reused while the corpus and configuration
/// fingerprints still match.
pub struct ReportEngine {
    config: Arc<WidgetscopeConfig>,
    resolver: Arc<dyn MetadataResolver>,
    cache: Option<ReportCache>,
}

impl ReportEngine {
    pub fn new(config: WidgetscopeConfig) -> Self {
        let config = Arc::new(config);
        let resolver = Arc::new(SiteMetadataResolver::from_config(config.clone()));
        Self {
            config,
            resolver,
            cache: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn MetadataResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_cache(mut self, cache: ReportCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &WidgetscopeConfig {
        &self.config
    }

    /// The configured query narrowed to the given post types and statuses.
    pub fn query(&self, post_types: Vec<String>, statuses: Vec<String>) -> DocumentQuery {
        DocumentQuery {
            post_types,
            statuses,
            ..self.config.query()
        }
    }

    pub fn run(
        &self,
        root: &Path,
        query: &DocumentQuery,
        cancel: &CancellationToken,
    ) -> Result<Report> {
        let source = DirectorySource::new(root);

        let key = match &self.cache {
            Some(_) => source
                .fingerprint()?
                .map(|corpus| cache_key(corpus, self.config.fingerprint(), query)),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            if let Some(index) = cache.load(root, key) {
                return Ok(Report { index, stats: None });
            }
        }

        let IndexReport { index, stats } = self.index(&source, query, cancel)?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            if let Err(e) = cache.store(root, key, &index) {
                tracing::warn!("Failed to cache report for {}: {}", root.display(), e);
            }
        }

        Ok(Report {
            index,
            stats: Some(stats),
        })
    }

    pub fn index(
        &self,
        source: &dyn DocumentSource,
        query: &DocumentQuery,
        cancel: &CancellationToken,
    ) -> Result<IndexReport> {
        CorpusIndexer::new(self.resolver.clone())
            .with_parallel(self.config.parallel)
            .index_source(source, query, cancel)
    }
}
