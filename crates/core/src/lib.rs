pub mod cache;
pub mod config;
pub mod counter;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod tree;
pub mod util;

pub use cache::ReportCache;
pub use config::WidgetscopeConfig;
pub use counter::TreeCounter;
pub use error::{Result, WidgetscopeError};
pub use indexer::{CorpusIndexer, IndexReport, IndexStats};
pub use report::ReportEngine;
pub use resolver::{ConfiguredEditor, EditPolicy, SiteMetadataResolver};
pub use scanner::DirectorySource;

pub use tokio_util::sync::CancellationToken;
