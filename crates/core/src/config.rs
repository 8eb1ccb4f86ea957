use crate::error::{Result, WidgetscopeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use widgetscope_api::{DEFAULT_WIDGET_MARKER, DocumentQuery};
use xxhash_rust::xxh3::xxh3_64;

pub const DEFAULT_HOME_DIR: &str = ".widgetscope";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_BUILDER_URL_TEMPLATE: &str = "{site}/wp-admin/post.php?post={id}&action=elementor";
pub const DEFAULT_EDITOR_URL_TEMPLATE: &str = "{site}/wp-admin/post.php?post={id}&action=edit";

/// Gets the base directory for logs, cached reports and the config file,
/// supporting the WIDGETSCOPE_HOME env var.
pub fn base_dir() -> PathBuf {
    if let Ok(env_dir) = std::env::var("WIDGETSCOPE_HOME") {
        return PathBuf::from(env_dir);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string())))
        .join(DEFAULT_HOME_DIR)
}

/// Location of the config file, supporting the WIDGETSCOPE_CONFIG env var.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("WIDGETSCOPE_CONFIG") {
        return PathBuf::from(path);
    }
    base_dir().join(CONFIG_FILE_NAME)
}

/// What the current user may do with the host's editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub edit_with_builder: bool,
    pub edit_posts: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            edit_with_builder: true,
            edit_posts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetscopeConfig {
    /// Prefix substituted for `{site}` in the URL templates.
    pub site_url: String,
    pub builder_url_template: String,
    pub editor_url_template: String,
    pub permissions: Permissions,
    /// Singular labels per post type, e.g. `page` -> `Page`.
    pub post_type_labels: BTreeMap<String, String>,
    pub status_labels: BTreeMap<String, String>,
    /// Catalog of known widget types and their display titles.
    pub widget_titles: BTreeMap<String, String>,
    pub marker_pattern: String,
    pub parallel: bool,
}

impl Default for WidgetscopeConfig {
    fn default() -> Self {
        let status_labels = [
            ("publish", "Published"),
            ("draft", "Draft"),
            ("pending", "Pending"),
            ("private", "Private"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            site_url: String::new(),
            builder_url_template: DEFAULT_BUILDER_URL_TEMPLATE.to_string(),
            editor_url_template: DEFAULT_EDITOR_URL_TEMPLATE.to_string(),
            permissions: Permissions::default(),
            post_type_labels: BTreeMap::new(),
            status_labels,
            widget_titles: BTreeMap::new(),
            marker_pattern: DEFAULT_WIDGET_MARKER.to_string(),
            parallel: false,
        }
    }
}

impl WidgetscopeConfig {
    /// Loads the config from its default location. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| WidgetscopeError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.marker_pattern.is_empty() {
            regex::Regex::new(&self.marker_pattern)
                .map_err(|e| WidgetscopeError::Config(format!("invalid marker_pattern: {}", e)))?;
        }
        for (name, template) in [
            ("builder_url_template", &self.builder_url_template),
            ("editor_url_template", &self.editor_url_template),
        ] {
            if !template.contains("{id}") {
                return Err(WidgetscopeError::Config(format!(
                    "{} must contain an {{id}} placeholder",
                    name
                )));
            }
        }
        Ok(())
    }

    /// The base query for this configuration. An empty marker disables pre-filtering.
    pub fn query(&self) -> DocumentQuery {
        DocumentQuery {
            marker: (!self.marker_pattern.is_empty()).then(|| self.marker_pattern.clone()),
            ..DocumentQuery::default()
        }
    }

    pub fn widget_title(&self, widget_type: &str) -> Option<&str> {
        self.widget_titles.get(widget_type).map(String::as_str)
    }

    /// Hash of every setting that influences report content.
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        xxh3_64(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = WidgetscopeConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, WidgetscopeConfig::default());
        assert_eq!(config.query().marker.as_deref(), Some(DEFAULT_WIDGET_MARKER));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"site_url": "https://example.org", "permissions": {"edit_posts": false}, "widget_titles": {"heading": "Heading"}}"#,
        )
        .unwrap();

        let config = WidgetscopeConfig::load_from(&path).unwrap();
        assert_eq!(config.site_url, "https://example.org");
        assert!(config.permissions.edit_with_builder);
        assert!(!config.permissions.edit_posts);
        assert_eq!(config.widget_title("heading"), Some("Heading"));
        assert_eq!(config.status_labels.get("draft").map(String::as_str), Some("Draft"));
    }

    #[test]
    fn test_invalid_marker_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"marker_pattern": "(unclosed"}"#).unwrap();

        assert!(matches!(
            WidgetscopeConfig::load_from(&path),
            Err(WidgetscopeError::Config(_))
        ));
    }

    #[test]
    fn test_empty_marker_disables_prefilter() {
        let config = WidgetscopeConfig {
            marker_pattern: String::new(),
            ..WidgetscopeConfig::default()
        };
        assert_eq!(config.query().marker, None);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = WidgetscopeConfig::default();
        let mut b = WidgetscopeConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.site_url = "https://example.org".to_string();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
