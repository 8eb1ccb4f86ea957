use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use widgetscope_core::report::Report;
use widgetscope_core::{CancellationToken, ReportCache, ReportEngine, WidgetscopeConfig};

/// Options shared by every command that indexes a corpus.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Directory holding the document records
    #[arg(value_name = "CORPUS_PATH")]
    pub path: PathBuf,
    /// Only include these post types (repeatable)
    #[arg(long = "post-type", value_name = "TYPE")]
    pub post_types: Vec<String>,
    /// Only include these statuses (repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    pub statuses: Vec<String>,
    /// Index documents on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
    /// Reuse a cached report while the corpus is unchanged
    #[arg(long)]
    pub cached: bool,
}

pub struct ScanOutcome {
    pub report: Report,
    pub config: WidgetscopeConfig,
}

/// Indexes the corpus on a blocking worker. Ctrl-C and the timeout cancel the
/// build between documents.
pub async fn scan(args: ScanArgs) -> Result<ScanOutcome, Box<dyn std::error::Error>> {
    let mut config = WidgetscopeConfig::load()?;
    config.parallel |= args.parallel;

    let mut engine = ReportEngine::new(config.clone());
    if args.cached {
        engine = engine.with_cache(ReportCache::default_location());
    }
    let engine = Arc::new(engine);
    let query = engine.query(args.post_types.clone(), args.statuses.clone());

    info!("Indexing corpus at: {}...", args.path.display());

    let cancel = CancellationToken::new();
    let worker = {
        let engine = engine.clone();
        let cancel = cancel.clone();
        let path = args.path.clone();
        tokio::task::spawn_blocking(move || engine.run(&path, &query, &cancel))
    };

    let watchdog = {
        let cancel = cancel.clone();
        let timeout = args.timeout_secs.map(Duration::from_secs);
        tokio::spawn(async move {
            let deadline = async {
                match timeout {
                    Some(timeout) => tokio::time::sleep(timeout).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => warn!("Interrupted, stopping after the current document"),
                _ = deadline => warn!("Timed out, stopping after the current document"),
                _ = cancel.cancelled() => {}
            }
            cancel.cancel();
        })
    };

    let result = worker.await;
    cancel.cancel();
    let _ = watchdog.await;

    let report = result??;
    match &report.stats {
        Some(stats) => info!(
            "Indexed {} documents, {} with widgets",
            stats.scanned, stats.with_widgets
        ),
        None => info!("Using cached report"),
    }

    Ok(ScanOutcome { report, config })
}
