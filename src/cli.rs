//! Command-line interface for vocabcheck.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::cache::{CacheOptions, FactCache, DEFAULT_CACHE_DIR_NAME};
use crate::config::{self, AnalysisConfig, AnalyzeOptions};
use crate::logging::{self, LogLevel};
use crate::pipeline::{ComponentRegistry, PipelineBuilder};
use crate::report;

/// Exit codes.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_INCOHERENT: i32 = 2;

/// Recover the domain vocabulary of a C/C++ codebase and flag naming
/// inconsistencies.
///
/// vocabcheck reads AST facts produced by a compiler-based indexer, builds
/// a glossary of canonical terms and relationships, and reports duplicate
/// names, conflicting verbs, ambiguous aliases and accessor or lifecycle
/// convention violations.
#[derive(Parser)]
#[command(name = "vocabcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the vocabulary and check it for coherence
    Analyze(AnalyzeArgs),
    /// Copy previously generated reports
    Report(ReportArgs),
    /// Manage the AST fact cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove the fact cache directory
    Clean(CacheCleanArgs),
}

/// Verbosity flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct LoggingArgs {
    /// Log level: error, warn, info, or debug
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Shorthand for --log-level info
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Shorthand for --log-level debug
    #[arg(long, global = true)]
    pub debug: bool,
}

impl LoggingArgs {
    /// Level requested on the command line, if any. `--debug` beats
    /// `--verbose`, which beats `--log-level`.
    pub fn level(&self) -> Result<Option<LogLevel>, config::ConfigError> {
        if self.debug {
            return Ok(Some(LogLevel::Debug));
        }
        if self.verbose {
            return Ok(Some(LogLevel::Info));
        }
        self.log_level
            .as_deref()
            .map(config::parse_log_level)
            .transpose()
    }
}

/// Arguments for the analyze command.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Project source root
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Build directory (default: <root>/build)
    #[arg(long)]
    pub build: Option<PathBuf>,

    /// Output directory for reports (default: <root>)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// YAML config file supplying defaults for these options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report formats: markdown, json (comma-separated or repeated)
    #[arg(short, long = "format", value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Cache AST facts between runs
    #[arg(long)]
    pub cache_ast: bool,

    /// Cache directory (default: <root>/.vocabcheck_cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Remove the cache before indexing
    #[arg(long)]
    pub clean_cache: bool,

    /// Free-form scope description shown in the report header
    #[arg(long)]
    pub scope_notes: Option<String>,

    /// Extractor component name
    #[arg(long)]
    pub extractor: Option<String>,

    /// Analyzer component name
    #[arg(long)]
    pub analyzer: Option<String>,

    /// Reporter component name
    #[arg(long)]
    pub reporter: Option<String>,

    /// Namespaces to ignore in addition to the defaults
    #[arg(long = "ignore-namespace", value_delimiter = ',')]
    pub ignored_namespaces: Vec<String>,

    /// Paths or globs (relative to the root) to skip during discovery
    #[arg(long = "ignore-path")]
    pub ignored_paths: Vec<String>,

    /// AST fact document (default: <build>/ast_facts.json)
    #[arg(long = "facts")]
    pub facts_file: Option<PathBuf>,

    /// Toolchain version that produced the facts; part of the cache key
    #[arg(long)]
    pub toolchain: Option<String>,
}

impl AnalyzeArgs {
    /// Command-line options as an overlay for the config file.
    pub fn to_options(&self) -> Result<AnalyzeOptions, config::ConfigError> {
        Ok(AnalyzeOptions {
            root: self.root.clone(),
            build: self.build.clone(),
            out: self.out.clone(),
            formats: config::parse_formats(&self.formats)?,
            cache_ast: self.cache_ast.then_some(true),
            cache_dir: self.cache_dir.clone(),
            clean_cache: self.clean_cache.then_some(true),
            log_level: None,
            scope_notes: self.scope_notes.clone(),
            extractor: self.extractor.clone(),
            analyzer: self.analyzer.clone(),
            reporter: self.reporter.clone(),
            ignored_namespaces: self.ignored_namespaces.clone(),
            ignored_paths: self.ignored_paths.clone(),
            facts_file: self.facts_file.clone(),
            toolchain: self.toolchain.clone(),
            heuristics: None,
        })
    }
}

/// Arguments for the report command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Directory holding previously generated reports
    #[arg(long)]
    pub root: PathBuf,

    /// Destination directory (default: --root)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Formats to copy (default: all available)
    #[arg(short, long = "format", value_delimiter = ',')]
    pub formats: Vec<String>,
}

/// Arguments for the cache clean command.
#[derive(Args, Debug)]
pub struct CacheCleanArgs {
    /// Project source root
    #[arg(long)]
    pub root: PathBuf,

    /// Cache directory (default: <root>/.vocabcheck_cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Resolve the full analysis configuration from the config file and flags.
pub fn resolve_config(args: &AnalyzeArgs, logging: &LoggingArgs) -> anyhow::Result<AnalysisConfig> {
    let file_options = match &args.config {
        Some(path) => AnalyzeOptions::parse_file(path)?,
        None => AnalyzeOptions::default(),
    };
    let mut options = file_options.merge(args.to_options()?);
    if let Some(level) = logging.level()? {
        options.log_level = Some(level);
    }

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let absolute = |p: PathBuf| if p.is_relative() { cwd.join(p) } else { p };
    options.root = options.root.map(absolute);
    options.build = options.build.map(absolute);
    options.out = options.out.map(absolute);
    options.cache_dir = options.cache_dir.map(absolute);

    Ok(AnalysisConfig::from_options(options)?)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, logging: &LoggingArgs) -> anyhow::Result<i32> {
    let config = resolve_config(args, logging)?;
    logging::init(config.log_level);
    tracing::debug!(root = %config.root.display(), "resolved configuration");

    let pipeline = PipelineBuilder::from_config(ComponentRegistry::with_defaults(), &config).build()?;
    let result = pipeline.run(&config)?;
    report::print_summary(&result);

    if result.coherence.is_incoherent() {
        Ok(EXIT_INCOHERENT)
    } else {
        Ok(EXIT_CLEAN)
    }
}

/// Run the report command.
pub fn run_report(args: &ReportArgs, logging: &LoggingArgs) -> anyhow::Result<i32> {
    logging::init(logging.level()?.unwrap_or_default());

    let formats = config::parse_formats(&args.formats)?;
    let out = args.out.as_deref().unwrap_or(&args.root);
    for path in report::copy_reports(&args.root, out, &formats)? {
        println!("Report available at {}", path.display());
    }
    Ok(EXIT_CLEAN)
}

/// Run the cache clean command.
pub fn run_cache_clean(args: &CacheCleanArgs, logging: &LoggingArgs) -> anyhow::Result<i32> {
    logging::init(logging.level()?.unwrap_or_default());

    let directory = cache_directory(&args.root, args.cache_dir.as_deref());
    if !directory.exists() {
        println!("No cache directory found at {}", directory.display());
        return Ok(EXIT_CLEAN);
    }

    let cache = FactCache::new(CacheOptions {
        enabled: false,
        clean: true,
        directory: Some(directory.clone()),
    });
    cache.clean();
    if directory.exists() {
        anyhow::bail!("failed to remove cache directory {}", directory.display());
    }
    println!("Removed cache at {}", directory.display());
    Ok(EXIT_CLEAN)
}

fn cache_directory(root: &Path, cache_dir: Option<&Path>) -> PathBuf {
    match cache_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => root.join(DEFAULT_CACHE_DIR_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "vocabcheck",
            "analyze",
            "--root",
            "/proj",
            "--format",
            "markdown,json",
            "--cache-ast",
            "--ignore-namespace",
            "boost,absl",
            "--debug",
        ])
        .unwrap();

        assert!(cli.logging.debug);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.root, Some(PathBuf::from("/proj")));
        assert_eq!(options.formats, vec![ReportFormat::Markdown, ReportFormat::Json]);
        assert_eq!(options.cache_ast, Some(true));
        assert_eq!(options.clean_cache, None);
        assert_eq!(options.ignored_namespaces, vec!["boost", "absl"]);
    }

    #[test]
    fn test_cli_parses_cache_clean() {
        let cli =
            Cli::try_parse_from(["vocabcheck", "cache", "clean", "--root", "/proj"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommands::Clean(_))));
    }

    #[test]
    fn test_logging_flag_precedence() {
        let args = LoggingArgs {
            log_level: Some("error".to_string()),
            verbose: true,
            debug: false,
        };
        assert_eq!(args.level().unwrap(), Some(LogLevel::Info));

        let args = LoggingArgs {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(args.level().is_err());
    }

    #[test]
    fn test_resolve_config_merges_file_and_flags() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("vocabcheck.yaml");
        fs::write(
            &config_path,
            format!(
                "root: {}\nscope_notes: from file\nformats: json\nlog_level: info\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let args = AnalyzeArgs {
            config: Some(config_path),
            scope_notes: Some("from flag".to_string()),
            ..Default::default()
        };
        let config = resolve_config(&args, &LoggingArgs::default()).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.scope_notes, "from flag");
        assert_eq!(config.formats, vec![ReportFormat::Json]);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_resolve_config_requires_root() {
        let err = resolve_config(&AnalyzeArgs::default(), &LoggingArgs::default()).unwrap_err();
        assert!(err.to_string().contains("--root is required"));
    }

    #[test]
    fn test_cache_clean_removes_directory() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join(DEFAULT_CACHE_DIR_NAME);
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("ast_cache_x.dat"), "# header\n").unwrap();

        let args = CacheCleanArgs {
            root: dir.path().to_path_buf(),
            cache_dir: None,
        };
        assert_eq!(run_cache_clean(&args, &LoggingArgs::default()).unwrap(), EXIT_CLEAN);
        assert!(!cache.exists());

        // Second run finds nothing to remove.
        assert_eq!(run_cache_clean(&args, &LoggingArgs::default()).unwrap(), EXIT_CLEAN);
    }
}
