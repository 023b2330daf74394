//! Configuration for vocabcheck.
//!
//! An optional YAML file supplies defaults; CLI options override it. Keys
//! are matched case-insensitively, with `-` and `_` interchangeable and a
//! few legacy aliases accepted.

use std::fs;
use std::path::{Path, PathBuf};

use phf::phf_map;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use crate::cache::{CacheOptions, DEFAULT_CACHE_DIR_NAME};
use crate::coherence::AnalyzerConfig;
use crate::extract::{RelevanceConfig, ScopeConfig, DEFAULT_IGNORED_NAMESPACES};
use crate::logging::LogLevel;
use crate::report::ReportFormat;

/// Keys accepted at the top level of a config file.
pub const SUPPORTED_KEYS: &[&str] = &[
    "root",
    "build",
    "out",
    "formats",
    "cache_ast",
    "cache_dir",
    "clean_cache",
    "log_level",
    "scope_notes",
    "extractor",
    "analyzer",
    "reporter",
    "ignored_namespaces",
    "ignored_paths",
    "facts_file",
    "toolchain",
    "heuristics",
];

static KEY_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "build_directory" => "build",
    "output" => "out",
    "output_directory" => "out",
    "format" => "formats",
    "cache_directory" => "cache_dir",
};

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported config format: {0} (expected .yml or .yaml)")]
    UnsupportedExtension(String),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config file must contain a mapping at the top level")]
    NotAMapping,

    #[error("unknown config key: {key}. Supported keys: {supported}")]
    UnknownKey { key: String, supported: String },

    #[error("config key '{key}' must be {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("unsupported format: {0} (supported: markdown, json)")]
    UnsupportedFormat(String),

    #[error("unknown log level: {0} (expected error, warn, info or debug)")]
    UnknownLogLevel(String),

    #[error("--root is required (or set `root` in the config file)")]
    MissingRoot,
}

/// Tunable heuristic constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicsConfig {
    /// Substrings that mark helper/utility symbols.
    pub helper_markers: Vec<String>,
    /// Terms are kept iff their relevance score exceeds this.
    pub keep_threshold: i64,
    /// Usage count from which an unrelated term is flagged.
    pub high_usage_threshold: usize,
    /// Namespaces ignored in addition to `ignored_namespaces`.
    pub default_ignored_namespaces: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        let relevance = RelevanceConfig::default();
        Self {
            helper_markers: relevance.helper_markers,
            keep_threshold: relevance.keep_threshold,
            high_usage_threshold: AnalyzerConfig::default().high_usage_threshold,
            default_ignored_namespaces: DEFAULT_IGNORED_NAMESPACES
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

impl HeuristicsConfig {
    pub fn relevance(&self) -> RelevanceConfig {
        RelevanceConfig {
            helper_markers: self.helper_markers.clone(),
            keep_threshold: self.keep_threshold,
        }
    }

    pub fn analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            high_usage_threshold: self.high_usage_threshold,
        }
    }
}

/// Options for `analyze`, as read from a config file or the command line.
///
/// Every field is optional so two sets can be layered with [`merge`].
///
/// [`merge`]: AnalyzeOptions::merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    pub root: Option<PathBuf>,
    pub build: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub formats: Vec<ReportFormat>,
    pub cache_ast: Option<bool>,
    pub cache_dir: Option<PathBuf>,
    pub clean_cache: Option<bool>,
    pub log_level: Option<LogLevel>,
    pub scope_notes: Option<String>,
    pub extractor: Option<String>,
    pub analyzer: Option<String>,
    pub reporter: Option<String>,
    pub ignored_namespaces: Vec<String>,
    pub ignored_paths: Vec<String>,
    pub facts_file: Option<PathBuf>,
    pub toolchain: Option<String>,
    pub heuristics: Option<HeuristicsConfig>,
}

impl AnalyzeOptions {
    /// Parse options from a YAML config file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if extension != "yml" && extension != "yaml" {
            return Err(ConfigError::UnsupportedExtension(format!(".{}", extension)));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse options from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mapping = match serde_yaml::from_str::<Value>(content)? {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(ConfigError::NotAMapping),
        };

        let mut options = Self::default();
        for (raw_key, node) in &mapping {
            let raw_key = scalar_string(raw_key).ok_or(ConfigError::NotAMapping)?;
            let key = normalize_key(&raw_key)?;
            match key {
                "root" => options.root = Some(path_like(key, node)?),
                "build" => options.build = Some(path_like(key, node)?),
                "out" => options.out = Some(path_like(key, node)?),
                "cache_dir" => options.cache_dir = Some(path_like(key, node)?),
                "facts_file" => options.facts_file = Some(path_like(key, node)?),
                "formats" => options.formats = parse_formats(&string_list(key, node)?)?,
                "cache_ast" => options.cache_ast = Some(bool_like(key, node)?),
                "clean_cache" => options.clean_cache = Some(bool_like(key, node)?),
                "log_level" => options.log_level = Some(parse_log_level(&scalar(key, node)?)?),
                "scope_notes" => options.scope_notes = Some(scalar(key, node)?),
                "extractor" => options.extractor = Some(scalar(key, node)?),
                "analyzer" => options.analyzer = Some(scalar(key, node)?),
                "reporter" => options.reporter = Some(scalar(key, node)?),
                "toolchain" => options.toolchain = Some(scalar(key, node)?),
                "ignored_namespaces" => {
                    options.ignored_namespaces = split_list(&string_list(key, node)?)
                }
                "ignored_paths" => options.ignored_paths = string_list(key, node)?,
                "heuristics" => {
                    options.heuristics = Some(serde_yaml::from_value(node.clone())?)
                }
                _ => unreachable!("normalize_key only returns supported keys"),
            }
        }
        Ok(options)
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Scalars override when set, lists when non-empty, and flags only when
    /// true.
    pub fn merge(self, overrides: AnalyzeOptions) -> AnalyzeOptions {
        fn flag(base: Option<bool>, over: Option<bool>) -> Option<bool> {
            match over {
                Some(true) => Some(true),
                _ => base,
            }
        }
        fn list<T>(base: Vec<T>, over: Vec<T>) -> Vec<T> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        AnalyzeOptions {
            root: overrides.root.or(self.root),
            build: overrides.build.or(self.build),
            out: overrides.out.or(self.out),
            formats: list(self.formats, overrides.formats),
            cache_ast: flag(self.cache_ast, overrides.cache_ast),
            cache_dir: overrides.cache_dir.or(self.cache_dir),
            clean_cache: flag(self.clean_cache, overrides.clean_cache),
            log_level: overrides.log_level.or(self.log_level),
            scope_notes: overrides.scope_notes.or(self.scope_notes),
            extractor: overrides.extractor.or(self.extractor),
            analyzer: overrides.analyzer.or(self.analyzer),
            reporter: overrides.reporter.or(self.reporter),
            ignored_namespaces: list(self.ignored_namespaces, overrides.ignored_namespaces),
            ignored_paths: list(self.ignored_paths, overrides.ignored_paths),
            facts_file: overrides.facts_file.or(self.facts_file),
            toolchain: overrides.toolchain.or(self.toolchain),
            heuristics: overrides.heuristics.or(self.heuristics),
        }
    }
}

/// Fully resolved settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub root: PathBuf,
    pub build: PathBuf,
    pub out: PathBuf,
    pub formats: Vec<ReportFormat>,
    pub scope_notes: String,
    pub log_level: LogLevel,
    pub cache: CacheOptions,
    pub extractor: Option<String>,
    pub analyzer: Option<String>,
    pub reporter: Option<String>,
    pub scope: ScopeConfig,
    /// Globs or root-relative path prefixes skipped during source discovery.
    pub ignored_paths: Vec<String>,
    pub facts_file: Option<PathBuf>,
    pub toolchain: Option<String>,
    pub heuristics: HeuristicsConfig,
}

impl AnalysisConfig {
    /// Defaults for a project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let heuristics = HeuristicsConfig::default();
        Self {
            build: root.join("build"),
            out: root.clone(),
            formats: vec![ReportFormat::Markdown],
            scope_notes: String::new(),
            log_level: LogLevel::default(),
            cache: CacheOptions {
                enabled: false,
                clean: false,
                directory: Some(root.join(DEFAULT_CACHE_DIR_NAME)),
            },
            extractor: None,
            analyzer: None,
            reporter: None,
            scope: ScopeConfig {
                ignored_namespaces: Vec::new(),
                default_ignored_namespaces: heuristics.default_ignored_namespaces.clone(),
            },
            ignored_paths: Vec::new(),
            facts_file: None,
            toolchain: None,
            heuristics,
            root,
        }
    }

    /// Resolve merged options. `root` is required; everything else
    /// defaults relative to it.
    pub fn from_options(options: AnalyzeOptions) -> Result<Self, ConfigError> {
        let root = options.root.ok_or(ConfigError::MissingRoot)?;
        let mut config = Self::new(root);

        if let Some(build) = options.build {
            config.build = build;
        }
        if let Some(out) = options.out {
            config.out = out;
        }
        if !options.formats.is_empty() {
            config.formats = options.formats;
        }
        if let Some(notes) = options.scope_notes {
            config.scope_notes = notes;
        }
        if let Some(level) = options.log_level {
            config.log_level = level;
        }
        config.cache.enabled = options.cache_ast.unwrap_or(false);
        config.cache.clean = options.clean_cache.unwrap_or(false);
        if let Some(dir) = options.cache_dir {
            config.cache.directory = Some(dir);
        }
        config.extractor = options.extractor;
        config.analyzer = options.analyzer;
        config.reporter = options.reporter;
        if let Some(heuristics) = options.heuristics {
            config.scope.default_ignored_namespaces =
                heuristics.default_ignored_namespaces.clone();
            config.heuristics = heuristics;
        }
        config.scope.ignored_namespaces = options.ignored_namespaces;
        config.ignored_paths = options.ignored_paths;
        config.facts_file = options.facts_file;
        config.toolchain = options.toolchain;

        Ok(config)
    }
}

/// Normalize a raw key and check it is supported.
pub fn normalize_key(raw: &str) -> Result<&'static str, ConfigError> {
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    let normalized = KEY_ALIASES
        .get(normalized.as_str())
        .copied()
        .unwrap_or(normalized.as_str());
    SUPPORTED_KEYS
        .iter()
        .find(|k| **k == normalized)
        .copied()
        .ok_or_else(|| ConfigError::UnknownKey {
            key: raw.to_string(),
            supported: SUPPORTED_KEYS.join(", "),
        })
}

/// `true`, `1`, `yes` and `on` (any case) are true; anything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Parse format names, dropping duplicates.
pub fn parse_formats(values: &[String]) -> Result<Vec<ReportFormat>, ConfigError> {
    let mut formats = Vec::new();
    for value in split_list(values) {
        let format = ReportFormat::parse(&value)
            .ok_or_else(|| ConfigError::UnsupportedFormat(value.clone()))?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

pub fn parse_log_level(value: &str) -> Result<LogLevel, ConfigError> {
    LogLevel::parse(value).ok_or_else(|| ConfigError::UnknownLogLevel(value.to_string()))
}

/// Split comma-separated entries and drop blanks.
fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn scalar_string(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar(key: &str, node: &Value) -> Result<String, ConfigError> {
    scalar_string(node).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a string value",
    })
}

fn path_like(key: &str, node: &Value) -> Result<PathBuf, ConfigError> {
    if let Some(value) = scalar_string(node) {
        return Ok(PathBuf::from(value));
    }
    if let Value::Mapping(mapping) = node {
        for candidate in ["path", "dir", "directory"] {
            if let Some(inner) = mapping.get(candidate) {
                return scalar(key, inner).map(PathBuf::from);
            }
        }
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "a mapping containing 'path', 'dir', or 'directory'",
        });
    }
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a string or mapping",
    })
}

fn string_list(key: &str, node: &Value) -> Result<Vec<String>, ConfigError> {
    if let Some(value) = scalar_string(node) {
        return Ok(vec![value]);
    }
    match node {
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_string(item).ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_string(),
                    expected: "a list of strings",
                })
            })
            .collect(),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "a string or list of strings",
        }),
    }
}

fn bool_like(key: &str, node: &Value) -> Result<bool, ConfigError> {
    match node {
        Value::Bool(b) => Ok(*b),
        other => scalar_string(other)
            .map(|s| parse_bool(&s))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                expected: "a boolean or boolean-like string",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
root: /work/project
Build-Directory:
  path: /work/project/out/build
output: reports
format: "markdown,json,markdown"
cache_ast: "yes"
clean-cache: false
log_level: debug
scope_notes: Core engine only
ignored_namespaces: [boost, "absl,fmt"]
ignored_paths:
  - third_party
  - "**/generated/**"
heuristics:
  keep_threshold: 1
  high_usage_threshold: 5
"#;
        let options = AnalyzeOptions::from_yaml_str(yaml).unwrap();

        assert_eq!(options.root, Some(PathBuf::from("/work/project")));
        assert_eq!(options.build, Some(PathBuf::from("/work/project/out/build")));
        assert_eq!(options.out, Some(PathBuf::from("reports")));
        assert_eq!(options.formats, vec![ReportFormat::Markdown, ReportFormat::Json]);
        assert_eq!(options.cache_ast, Some(true));
        assert_eq!(options.clean_cache, Some(false));
        assert_eq!(options.log_level, Some(LogLevel::Debug));
        assert_eq!(options.ignored_namespaces, vec!["boost", "absl", "fmt"]);
        assert_eq!(options.ignored_paths.len(), 2);

        let heuristics = options.heuristics.unwrap();
        assert_eq!(heuristics.keep_threshold, 1);
        assert_eq!(heuristics.high_usage_threshold, 5);
        assert_eq!(heuristics.helper_markers, vec!["helper", "util", "internal"]);
    }

    #[test]
    fn test_unknown_key_lists_supported_keys() {
        let err = AnalyzeOptions::from_yaml_str("colour: blue").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown config key: colour"));
        assert!(message.contains("ignored_namespaces"));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let err = AnalyzeOptions::from_yaml_str("formats: [html]").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(f) if f == "html"));
    }

    #[test]
    fn test_path_mapping_requires_known_key() {
        let err = AnalyzeOptions::from_yaml_str("root:\n  location: /x").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AnalyzeOptions::from_yaml_str("").unwrap(), AnalyzeOptions::default());
    }

    #[test]
    fn test_parse_file_checks_extension_and_existence() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            AnalyzeOptions::parse_file(&missing),
            Err(ConfigError::NotFound(_))
        ));

        let toml = dir.path().join("config.toml");
        fs::write(&toml, "root = 1").unwrap();
        assert!(matches!(
            AnalyzeOptions::parse_file(&toml),
            Err(ConfigError::UnsupportedExtension(_))
        ));

        let yaml = dir.path().join("config.yml");
        fs::write(&yaml, "root: /src\n").unwrap();
        let options = AnalyzeOptions::parse_file(&yaml).unwrap();
        assert_eq!(options.root, Some(PathBuf::from("/src")));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = AnalyzeOptions {
            root: Some(PathBuf::from("/from/file")),
            scope_notes: Some("file notes".to_string()),
            cache_ast: Some(true),
            ignored_namespaces: vec!["boost".to_string()],
            ..Default::default()
        };
        let cli = AnalyzeOptions {
            root: Some(PathBuf::from("/from/cli")),
            cache_ast: Some(false),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.root, Some(PathBuf::from("/from/cli")));
        assert_eq!(merged.scope_notes.as_deref(), Some("file notes"));
        assert_eq!(merged.cache_ast, Some(true));
        assert_eq!(merged.ignored_namespaces, vec!["boost"]);
    }

    #[test]
    fn test_resolve_requires_root() {
        assert!(matches!(
            AnalysisConfig::from_options(AnalyzeOptions::default()),
            Err(ConfigError::MissingRoot)
        ));
    }

    #[test]
    fn test_resolve_defaults_relative_to_root() {
        let config = AnalysisConfig::from_options(AnalyzeOptions {
            root: Some(PathBuf::from("/proj")),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.build, PathBuf::from("/proj/build"));
        assert_eq!(config.out, PathBuf::from("/proj"));
        assert_eq!(config.formats, vec![ReportFormat::Markdown]);
        assert_eq!(
            config.cache.directory,
            Some(PathBuf::from("/proj").join(DEFAULT_CACHE_DIR_NAME))
        );
        assert!(!config.cache.enabled);
        assert_eq!(config.scope.default_ignored_namespaces, vec!["std", "testing", "gtest"]);
    }

    #[test]
    fn test_heuristics_override_default_namespaces() {
        let options = AnalyzeOptions::from_yaml_str(
            "root: /proj\nheuristics:\n  default_ignored_namespaces: []\n",
        )
        .unwrap();
        let config = AnalysisConfig::from_options(options).unwrap();
        assert!(config.scope.default_ignored_namespaces.is_empty());
    }

    #[test]
    fn test_parse_bool_variants() {
        for value in ["true", "1", "YES", " on "] {
            assert!(parse_bool(value), "{}", value);
        }
        for value in ["false", "0", "no", "maybe"] {
            assert!(!parse_bool(value), "{}", value);
        }
    }
}
