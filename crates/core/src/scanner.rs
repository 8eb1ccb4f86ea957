use crate::error::{Result, WidgetscopeError};
use crate::tree::from_str_unbounded;
use ignore::{DirEntry, WalkBuilder};
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use widgetscope_api::{ApiError, ApiResult, DocumentQuery, DocumentRecord, DocumentSource, DocumentStream};
use xxhash_rust::xxh3::Xxh3;

pub const RECORD_EXTENSION: &str = "json";

/// Directories holding build output or vendored packages, never records.
const SKIPPED_DIRS: &[&str] = &["target", "build", "node_modules"];

/// Whether the walk should enter or yield `entry`. Hidden entries and
/// skipped directories are pruned with everything below them; the root
/// itself is always kept.
fn is_walkable(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    if name.starts_with('.') {
        return false;
    }
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    !(is_dir && SKIPPED_DIRS.contains(&name))
}

/// Document source reading JSON records from a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads every record stored in one file. A file is either one record
    /// or an export array of them; export entries that fail to decode are
    /// skipped and the rest are kept.
    pub fn read_file(path: &Path) -> Result<Vec<DocumentRecord>> {
        let content = fs::read_to_string(path)?;
        match from_str_unbounded::<Value>(&content)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .enumerate()
                .filter_map(|(position, item)| match serde_json::from_value(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping record #{} of {}: {}",
                            position,
                            path.display(),
                            e
                        );
                        None
                    }
                })
                .collect()),
            item @ Value::Object(_) => Ok(vec![serde_json::from_value(item)?]),
            _ => Err(WidgetscopeError::Parsing(format!(
                "{} holds neither a record nor an export of records",
                path.display()
            ))),
        }
    }

    pub(crate) fn collect_paths(root: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
            .filter_entry(is_walkable)
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && path.extension().is_some_and(|e| e == RECORD_EXTENSION) {
                    return Some(path.to_path_buf());
                }
                None
            })
            .collect();
        paths.sort();
        paths
    }

    fn read_records_lossy(path: &Path) -> Vec<DocumentRecord> {
        match Self::read_file(path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn compile_marker(query: &DocumentQuery) -> ApiResult<Option<Regex>> {
        query
            .marker
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| ApiError::InvalidArgument(format!("invalid marker pattern: {}", e)))
    }
}

fn matches_marker(marker: Option<&Regex>, record: &DocumentRecord) -> bool {
    match marker {
        None => true,
        Some(re) => record
            .raw_tree
            .as_ref()
            .is_some_and(|tree| re.is_match(&tree.as_text())),
    }
}

impl DocumentSource for DirectorySource {
    fn query<'a>(&'a self, query: &DocumentQuery) -> ApiResult<DocumentStream<'a>> {
        if !self.root.is_dir() {
            return Err(ApiError::SourceUnavailable(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let marker = Self::compile_marker(query)?;
        let query = query.clone();
        let paths = Self::collect_paths(&self.root);
        tracing::debug!("Found {} record files under {}", paths.len(), self.root.display());

        Ok(Box::new(
            paths
                .into_iter()
                .flat_map(|path| Self::read_records_lossy(&path))
                .filter(move |record| query.allows(record) && matches_marker(marker.as_ref(), record)),
        ))
    }

    fn fingerprint(&self) -> ApiResult<Option<u64>> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut hasher = Xxh3::new();
        for path in Self::collect_paths(&self.root) {
            let metadata = fs::metadata(&path)
                .map_err(|e| ApiError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;
            let modified = metadata
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH)
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or(std::time::Duration::ZERO)
                .as_nanos();

            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            hasher.write(relative.to_string_lossy().as_bytes());
            hasher.write_u64(metadata.len());
            hasher.write_u128(modified);
        }
        Ok(Some(hasher.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use widgetscope_api::DocumentId;

    const WIDGET_TREE: &str = r#"[{\"elType\":\"widget\",\"widgetType\":\"heading\"}]"#;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn ids(source: &DirectorySource, query: &DocumentQuery) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = source.query(query).unwrap().map(|r| r.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_reads_single_records_and_exports() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "one.json",
            &format!(r#"{{"id": 1, "raw_tree": "{}"}}"#, WIDGET_TREE),
        );
        write(
            dir.path(),
            "nested/export.json",
            &format!(
                r#"[{{"id": 2, "raw_tree": "{0}"}}, {{"id": 3, "raw_tree": "{0}"}}]"#,
                WIDGET_TREE
            ),
        );
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), ".hidden/secret.json", r#"{"id": 99}"#);

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            ids(&source, &DocumentQuery::default()),
            vec![DocumentId::from(1), DocumentId::from(2), DocumentId::from(3)]
        );
    }

    #[test]
    fn test_marker_prefilter_is_whitespace_tolerant() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "spaced.json",
            r#"{"id": 1, "raw_tree": "[{\"elType\" :  \"widget\"}]"}"#,
        );
        write(dir.path(), "plain.json", r#"{"id": 2, "raw_tree": [{"elType": "section"}]}"#);
        write(dir.path(), "empty.json", r#"{"id": 3}"#);

        let source = DirectorySource::new(dir.path());
        assert_eq!(ids(&source, &DocumentQuery::default()), vec![DocumentId::from(1)]);

        let unfiltered = DocumentQuery {
            marker: None,
            ..DocumentQuery::default()
        };
        assert_eq!(ids(&source, &unfiltered).len(), 3);
    }

    #[test]
    fn test_post_type_and_status_filters() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "export.json",
            r#"[
                {"id": 1, "post_type": "page", "status": "publish"},
                {"id": 2, "post_type": "post", "status": "draft"},
                {"id": 3, "post_type": "page", "status": "draft"}
            ]"#,
        );
        let source = DirectorySource::new(dir.path());

        let query = DocumentQuery {
            marker: None,
            post_types: vec!["page".to_string()],
            statuses: vec!["draft".to_string()],
        };
        assert_eq!(ids(&source, &query), vec![DocumentId::from(3)]);
    }

    #[test]
    fn test_undecodable_files_are_skipped() {
        let dir = tempdir().unwrap();
        write(dir.path(), "broken.json", "{ not json");
        write(dir.path(), "ok.json", r#"{"id": 5}"#);

        let source = DirectorySource::new(dir.path());
        let query = DocumentQuery {
            marker: None,
            ..DocumentQuery::default()
        };
        assert_eq!(ids(&source, &query), vec![DocumentId::from(5)]);
    }

    #[test]
    fn test_bad_export_entries_do_not_drop_siblings() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "export.json",
            &format!(
                r#"[
                    {{"id": 1, "raw_tree": "{0}"}},
                    {{"id": 2, "title": null, "raw_tree": "{0}"}},
                    "stray",
                    {{"id": 3, "raw_tree": "{0}"}}
                ]"#,
                WIDGET_TREE
            ),
        );
        write(dir.path(), "scalar.json", "42");

        let records = DirectorySource::read_file(&dir.path().join("export.json")).unwrap();
        assert_eq!(records.len(), 2);

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            ids(&source, &DocumentQuery::default()),
            vec![DocumentId::from(1), DocumentId::from(3)]
        );
        assert!(matches!(
            DirectorySource::read_file(&dir.path().join("scalar.json")),
            Err(WidgetscopeError::Parsing(_))
        ));
    }

    #[test]
    fn test_build_and_vendor_directories_are_pruned() {
        let dir = tempdir().unwrap();
        let record = |id: u64| format!(r#"{{"id": {}, "raw_tree": "{}"}}"#, id, WIDGET_TREE);
        write(dir.path(), "node_modules/pkg/x.json", &record(7));
        write(dir.path(), "target/y.json", &record(8));
        write(dir.path(), "build/deep/z.json", &record(9));
        write(dir.path(), "content/build.json", &record(10));

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            ids(&source, &DocumentQuery::default()),
            vec![DocumentId::from(10)]
        );
    }

    #[test]
    fn test_inline_tree_deeper_than_json_default_limit() {
        let dir = tempdir().unwrap();
        let depth = 100;
        let mut tree = String::new();
        for _ in 0..depth {
            tree.push_str(r#"[{"elType":"section","elements":"#);
        }
        tree.push_str(r#"[{"elType":"widget","widgetType":"A"}]"#);
        for _ in 0..depth {
            tree.push_str("}]");
        }
        write(dir.path(), "deep.json", &format!(r#"{{"id": 4, "raw_tree": {}}}"#, tree));

        let records = DirectorySource::read_file(&dir.path().join("deep.json")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            crate::counter::TreeCounter::count_record(&records[0]).get("A"),
            Some(&1)
        );
    }

    #[test]
    fn test_missing_root_and_bad_marker_are_errors() {
        let dir = tempdir().unwrap();
        let missing = DirectorySource::new(dir.path().join("missing"));
        assert!(matches!(
            missing.query(&DocumentQuery::default()),
            Err(ApiError::SourceUnavailable(_))
        ));
        assert_eq!(missing.fingerprint().unwrap(), None);

        let source = DirectorySource::new(dir.path());
        let bad = DocumentQuery {
            marker: Some("(".to_string()),
            ..DocumentQuery::default()
        };
        assert!(matches!(source.query(&bad), Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_fingerprint_changes_with_corpus() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"id": 1}"#);
        let source = DirectorySource::new(dir.path());

        let before = source.fingerprint().unwrap().unwrap();
        assert_eq!(source.fingerprint().unwrap(), Some(before));

        write(dir.path(), "b.json", r#"{"id": 2}"#);
        assert_ne!(source.fingerprint().unwrap(), Some(before));
    }
}
