use std::path::PathBuf;
use tracing::info;
use widgetscope_core::ReportCache;

pub fn run(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cache = ReportCache::default_location();

    if let Some(path) = path {
        info!("Clearing cached report for corpus at: {}...", path.display());
        if cache.invalidate(&path)? {
            info!("Cached report cleared.");
        } else {
            info!("No cached report found.");
        }
    } else {
        info!("Clearing all cached reports at: {}...", cache.dir().display());
        cache.clear_all()?;
        info!("All cached reports cleared.");
    }
    Ok(())
}
