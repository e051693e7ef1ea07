//! Configuration management for `gtest_report`.
//!
//! Configuration sources, in order of precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`GTEST_REPORT_*`)
//! 3. Explicit config file (`--config`)
//! 4. User config (`~/.config/gtest-report/config.yaml`)
//! 5. Defaults
//!
//! Each source is read into a flat [`ConfigLayer`] of dotted keys
//! (`icons.success`, `resources.prefix`, ...). Layers are merged and then
//! resolved into a typed [`ReportConfig`].

use crate::error::{ReportError, Result, ResultExt};
use crate::format::StatusIcons;
use crate::sa::DEFAULT_ANCHOR_SEGMENT;
use crate::util::time::DISPLAY_FORMAT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "GTEST_REPORT_";
const DEFAULT_RESOURCE_PREFIX: &str = "html_resources";

const KEY_CATEGORIES: &str = "categories";
const KEY_ICON_SUCCESS: &str = "icons.success";
const KEY_ICON_FAILED: &str = "icons.failed";
const KEY_ICON_SKIPPED: &str = "icons.skipped";
const KEY_RESOURCE_PREFIX: &str = "resources.prefix";
const KEY_RESOURCES_DIR: &str = "resources.dir";
const KEY_TIMESTAMP_FORMAT: &str = "timestamp-format";
const KEY_SA_ANCHOR: &str = "sa.anchor";
const KEY_ROLLUP: &str = "suite-rollup";

/// One report category (a test stage such as `UT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Short code; also the input subdirectory and report file prefix.
    pub code: String,
    #[serde(alias = "name", alias = "display-name")]
    pub display_name: String,
    /// Render a per-suite rollup table in this category's report.
    #[serde(default, alias = "suite-rollup")]
    pub suite_rollup: bool,
}

impl CategoryConfig {
    #[must_use]
    pub fn new(code: &str, display_name: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            suite_rollup: false,
        }
    }

    /// `<code>_Report.html`
    #[must_use]
    pub fn report_file_name(&self) -> String {
        format!("{}_Report.html", self.code)
    }
}

/// The stages reported by default, in index order.
#[must_use]
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("UT", "Unit Test"),
        CategoryConfig::new("UIT", "Unit Integration Test"),
        CategoryConfig::new("CT", "Component Test"),
        CategoryConfig::new("CIT", "Component Integration Test"),
        CategoryConfig::new("SRT", "SW Requirement Test"),
    ]
}

fn default_display_name(code: &str) -> String {
    default_categories()
        .into_iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map_or_else(|| code.to_string(), |c| c.display_name)
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportConfig {
    pub categories: Vec<CategoryConfig>,
    pub icons: StatusIcons,
    /// Directory name, relative to the output directory, that icons are served from.
    pub resource_prefix: String,
    /// Directory copied to `<output>/<resource_prefix>` by `generate`.
    pub resources_dir: Option<PathBuf>,
    pub timestamp_format: String,
    pub sa_anchor: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            icons: StatusIcons::default(),
            resource_prefix: DEFAULT_RESOURCE_PREFIX.to_string(),
            resources_dir: None,
            timestamp_format: DISPLAY_FORMAT.to_string(),
            sa_anchor: DEFAULT_ANCHOR_SEGMENT.to_string(),
        }
    }
}

impl ReportConfig {
    /// Resolve a merged layer on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` for empty or duplicate category codes, or a blank
    /// value for a required setting.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(categories) = &layer.categories {
            config.categories.clone_from(categories);
        }
        if let Some(codes) = layer.get(KEY_ROLLUP) {
            let codes: Vec<&str> = codes.split(',').map(str::trim).collect();
            for category in &mut config.categories {
                category.suite_rollup = codes.iter().any(|c| c.eq_ignore_ascii_case(&category.code));
            }
        }
        if let Some(v) = layer.get(KEY_ICON_SUCCESS) {
            config.icons.success = v.clone();
        }
        if let Some(v) = layer.get(KEY_ICON_FAILED) {
            config.icons.failed = v.clone();
        }
        if let Some(v) = layer.get(KEY_ICON_SKIPPED) {
            config.icons.skipped = v.clone();
        }
        if let Some(v) = layer.get(KEY_RESOURCE_PREFIX) {
            config.resource_prefix = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = layer.get(KEY_RESOURCES_DIR) {
            let trimmed = v.trim();
            config.resources_dir = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
        }
        if let Some(v) = layer.get(KEY_TIMESTAMP_FORMAT) {
            config.timestamp_format = v.clone();
        }
        if let Some(v) = layer.get(KEY_SA_ANCHOR) {
            config.sa_anchor = v.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = Vec::new();
        for category in &self.categories {
            let code = category.code.trim();
            if code.is_empty() {
                return Err(ReportError::Config("category code must not be empty".into()));
            }
            if code.contains(['/', '\\']) {
                return Err(ReportError::Config(format!(
                    "category code '{code}' must not contain path separators"
                )));
            }
            if seen.iter().any(|s: &&str| s.eq_ignore_ascii_case(code)) {
                return Err(ReportError::Config(format!("duplicate category code '{code}'")));
            }
            seen.push(code);
        }

        for (key, value) in [
            (KEY_ICON_SUCCESS, &self.icons.success),
            (KEY_ICON_FAILED, &self.icons.failed),
            (KEY_ICON_SKIPPED, &self.icons.skipped),
            (KEY_TIMESTAMP_FORMAT, &self.timestamp_format),
            (KEY_SA_ANCHOR, &self.sa_anchor),
        ] {
            if value.trim().is_empty() {
                return Err(ReportError::Config(format!("'{key}' must not be empty")));
            }
        }
        Ok(())
    }

    /// Look up a category by code (case-insensitive).
    #[must_use]
    pub fn category(&self, code: &str) -> Option<&CategoryConfig> {
        self.categories
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

/// A configuration layer: flat dotted keys plus an optional category list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
    pub categories: Option<Vec<CategoryConfig>>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        if let Some(categories) = &other.categories {
            self.categories = Some(categories.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(&normalize_key(key))
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Build a layer from a YAML file path. Missing files return an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).with_path_context(path)?;
        let layer = Self::from_yaml_str(&contents)?;
        debug!(path = %path.display(), keys = layer.values.len(), "Loaded config file");
        Ok(layer)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or `categories` is malformed.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let mut value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut layer = Self::default();

        if let serde_yaml::Value::Mapping(map) = &mut value {
            if let Some(raw) = map.remove(KEY_CATEGORIES) {
                layer.categories = Some(categories_from_yaml(raw)?);
            }
        }

        let mut flat = HashMap::new();
        flatten_yaml(&value, "", &mut flat);
        for (key, value) in flat {
            layer.set(&key, value);
        }
        Ok(layer)
    }

    /// Build a layer from `GTEST_REPORT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let normalized = stripped.to_lowercase();
            if normalized == KEY_CATEGORIES {
                layer.categories = Some(categories_from_list(&value));
                continue;
            }
            layer.set(&env_key(&normalized), value);
        }
        layer
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub categories: Option<String>,
    pub suite_rollup: Option<String>,
    pub resources_dir: Option<PathBuf>,
    pub sa_anchor: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(list) = &self.categories {
            layer.categories = Some(categories_from_list(list));
        }
        if let Some(codes) = &self.suite_rollup {
            layer.set(KEY_ROLLUP, codes.clone());
        }
        if let Some(dir) = &self.resources_dir {
            layer.set(KEY_RESOURCES_DIR, dir.to_string_lossy().to_string());
        }
        if let Some(anchor) = &self.sa_anchor {
            layer.set(KEY_SA_ANCHOR, anchor.clone());
        }

        layer
    }
}

/// Path of the user config file (`~/.config/gtest-report/config.yaml`).
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(
        Path::new(&home)
            .join(".config")
            .join("gtest-report")
            .join("config.yaml"),
    )
}

/// Load user config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    user_config_path().map_or_else(|| Ok(ConfigLayer::default()), |path| ConfigLayer::from_yaml(&path))
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed, an explicit
/// config file does not exist, or the merged values are invalid.
pub fn load_config(explicit: Option<&Path>, cli: &CliOverrides) -> Result<ReportConfig> {
    let user = load_user_config()?;
    let explicit_layer = match explicit {
        Some(path) if !path.exists() => {
            return Err(ReportError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => ConfigLayer::from_yaml(path)?,
        None => ConfigLayer::default(),
    };
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    let merged = ConfigLayer::merge_layers(&[user, explicit_layer, env_layer, cli_layer]);
    ReportConfig::from_layer(&merged)
}

/// Parse `UT,CT=Component Test,...`; codes without a name use the built-in name.
#[must_use]
pub fn categories_from_list(list: &str) -> Vec<CategoryConfig> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((code, name)) => CategoryConfig::new(code.trim(), name.trim()),
            None => CategoryConfig::new(item, &default_display_name(item)),
        })
        .collect()
}

fn categories_from_yaml(raw: serde_yaml::Value) -> Result<Vec<CategoryConfig>> {
    match raw {
        serde_yaml::Value::String(list) => Ok(categories_from_list(&list)),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                serde_yaml::Value::String(code) => {
                    Ok(CategoryConfig::new(&code, &default_display_name(&code)))
                }
                other => serde_yaml::from_value::<CategoryConfig>(other).map_err(ReportError::from),
            })
            .collect(),
        _ => Err(ReportError::Config(
            "'categories' must be a list or a comma-separated string".into(),
        )),
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

// icons_success -> icons.success, timestamp_format -> timestamp-format
fn env_key(raw: &str) -> String {
    for section in ["icons", "resources", "sa"] {
        if let Some(rest) = raw.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    raw.to_string()
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
