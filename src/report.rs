//! Output formatting for vocabcheck results.
//!
//! Two report formats:
//! - Markdown: glossary, relationship and incoherence tables for humans
//! - JSON: the same content for programmatic consumption
//!
//! Plus a colored terminal summary printed after `analyze`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::*;
use serde::Serialize;

use crate::coherence::{CoherenceResult, Finding, Severity};
use crate::config::AnalysisConfig;
use crate::extract::{DslExtractionResult, DslRelationship, DslTerm, Workflow};
use crate::pipeline::{PipelineResult, Reporter};

/// Report file written for the Markdown format.
pub const MARKDOWN_REPORT_FILE: &str = "dsl_report.md";
/// Report file written for the JSON format.
pub const JSON_REPORT_FILE: &str = "dsl_report.json";

const NONE: &str = "None";

/// A rendered report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 2] = [ReportFormat::Markdown, ReportFormat::Json];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }

    /// File name the format is written to.
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => MARKDOWN_REPORT_FILE,
            ReportFormat::Json => JSON_REPORT_FILE,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rendered report text. A format that was not requested is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub markdown: String,
    pub json: String,
}

impl Report {
    pub fn get(&self, format: ReportFormat) -> &str {
        match format {
            ReportFormat::Markdown => &self.markdown,
            ReportFormat::Json => &self.json,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markdown.is_empty() && self.json.is_empty()
    }
}

/// The built-in reporter. Renders every format listed in the config.
#[derive(Debug, Clone, Default)]
pub struct MarkdownReporter {
    timestamp: Option<String>,
}

impl MarkdownReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed "generated on" value instead of the current time.
    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
        }
    }

    fn timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

impl Reporter for MarkdownReporter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn render(
        &self,
        extraction: &DslExtractionResult,
        coherence: &CoherenceResult,
        config: &AnalysisConfig,
    ) -> Report {
        let header = AnalysisHeader {
            generated_on: self.timestamp(),
            source: config.root.to_string_lossy().into_owned(),
            scope_notes: if config.scope_notes.is_empty() {
                NONE.to_string()
            } else {
                config.scope_notes.clone()
            },
        };

        let wants = |format: ReportFormat| {
            (config.formats.is_empty() && format == ReportFormat::Markdown)
                || config.formats.contains(&format)
        };

        let mut report = Report::default();
        if wants(ReportFormat::Markdown) {
            report.markdown = render_markdown(&header, extraction, coherence);
        }
        if wants(ReportFormat::Json) {
            report.json = render_json(&header, extraction, coherence);
        }
        report
    }
}

// =============================================================================
// Markdown
// =============================================================================

#[derive(Debug, Clone, Serialize)]
struct AnalysisHeader {
    generated_on: String,
    source: String,
    scope_notes: String,
}

fn render_markdown(
    header: &AnalysisHeader,
    extraction: &DslExtractionResult,
    coherence: &CoherenceResult,
) -> String {
    let mut out = String::from("# DSL Extraction Report\n\n");

    out.push_str("## Analysis Header\n\n");
    out.push_str("| Field | Value |\n| --- | --- |\n");
    out.push_str(&row(&["Generated On", &header.generated_on]));
    out.push_str(&row(&["Source", &header.source]));
    out.push_str(&row(&["Scope Notes", &header.scope_notes]));
    out.push('\n');

    out.push_str("## Canonical Terms (Glossary)\n\n");
    push_term_table(&mut out, &extraction.terms);

    out.push_str("## External Dependencies\n\n");
    push_term_table(&mut out, &extraction.external_dependencies);

    out.push_str("## Relationships\n\n");
    out.push_str("| Subject | Verb | Object | Evidence | Notes | Usage Count |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- |\n");
    if extraction.relationships.is_empty() {
        out.push_str(&empty_row(6));
    }
    for rel in &extraction.relationships {
        let notes = if rel.notes.is_empty() { "-" } else { rel.notes.as_str() };
        out.push_str(&row(&[
            &rel.subject,
            &rel.verb,
            &rel.object,
            &join_breaks(&rel.evidence),
            notes,
            &rel.usage_count.to_string(),
        ]));
    }
    out.push('\n');

    out.push_str("## Workflows\n\n");
    if extraction.workflows.is_empty() {
        out.push_str("- None\n\n");
    }
    for workflow in &extraction.workflows {
        out.push_str(&format!("- {}\n", workflow.name));
        for (i, step) in workflow.steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, step));
        }
        out.push('\n');
    }

    out.push_str("## Incoherence Report\n\n");
    out.push_str("| Rule | Term | Conflict | Examples | Suggested Canonical Form | Details |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- |\n");
    if coherence.findings.is_empty() {
        out.push_str(&empty_row(6));
    }
    for finding in &coherence.findings {
        let conflict = if finding.conflict.is_empty() {
            &finding.description
        } else {
            &finding.conflict
        };
        let suggested = if finding.suggested_canonical_form.is_empty() {
            "-"
        } else {
            finding.suggested_canonical_form.as_str()
        };
        out.push_str(&row(&[
            finding.rule.as_str(),
            &finding.term,
            conflict,
            &join_breaks(&finding.examples),
            suggested,
            &finding.description,
        ]));
    }
    out.push('\n');

    out.push_str("## Extraction Notes\n\n");
    if extraction.extraction_notes.is_empty() {
        out.push_str("- None\n");
    }
    for note in &extraction.extraction_notes {
        out.push_str(&format!("- {}\n", note));
    }

    out
}

fn push_term_table(out: &mut String, terms: &[DslTerm]) {
    out.push_str("| Term | Kind | Definition | Evidence | Aliases | Usage Count |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- |\n");
    if terms.is_empty() {
        out.push_str(&empty_row(6));
    }
    for term in terms {
        out.push_str(&row(&[
            &term.name,
            term.kind.as_str(),
            &term.definition,
            &join_breaks(&term.evidence),
            &join_breaks(&term.aliases),
            &term.usage_count.to_string(),
        ]));
    }
    out.push('\n');
}

fn row(cells: &[&str]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

fn empty_row(columns: usize) -> String {
    let mut cells = vec![NONE];
    cells.resize(columns, "-");
    row(&cells)
}

/// Escape pipes and flatten newlines so text stays inside its cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

fn join_breaks(items: &[String]) -> String {
    items.join("<br>")
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    analysis_header: &'a AnalysisHeader,
    terms: &'a [DslTerm],
    external_dependencies: &'a [DslTerm],
    relationships: &'a [DslRelationship],
    workflows: &'a [Workflow],
    incoherence_report: &'a [Finding],
    severity: Severity,
    extraction_notes: &'a [String],
}

fn render_json(
    header: &AnalysisHeader,
    extraction: &DslExtractionResult,
    coherence: &CoherenceResult,
) -> String {
    let report = JsonReport {
        analysis_header: header,
        terms: &extraction.terms,
        external_dependencies: &extraction.external_dependencies,
        relationships: &extraction.relationships,
        workflows: &extraction.workflows,
        incoherence_report: &coherence.findings,
        severity: coherence.severity,
        extraction_notes: &extraction.extraction_notes,
    };
    // Plain strings, numbers and lists; serialization cannot fail.
    serde_json::to_string_pretty(&report).unwrap_or_default()
}

// =============================================================================
// Report files
// =============================================================================

/// Write every non-empty format of `report` into `dir`.
pub fn write_reports(dir: &Path, report: &Report) -> anyhow::Result<Vec<PathBuf>> {
    if report.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut written = Vec::new();
    for format in ReportFormat::ALL {
        let content = report.get(format);
        if content.is_empty() {
            continue;
        }
        let path = dir.join(format.file_name());
        fs::write(&path, content)
            .with_context(|| format!("failed to write {} report {}", format, path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Formats with a report file present in `dir`.
pub fn available_reports(dir: &Path) -> Vec<ReportFormat> {
    ReportFormat::ALL
        .into_iter()
        .filter(|f| dir.join(f.file_name()).is_file())
        .collect()
}

/// Copy previously written reports from `root` into `out`.
///
/// With no requested formats every available report is copied. A requested
/// format without a report file is an error.
pub fn copy_reports(
    root: &Path,
    out: &Path,
    requested: &[ReportFormat],
) -> anyhow::Result<Vec<PathBuf>> {
    let available = available_reports(root);
    let formats: Vec<ReportFormat> = if requested.is_empty() {
        if available.is_empty() {
            anyhow::bail!("No cached reports found under {}", root.display());
        }
        available
    } else {
        for format in requested {
            if !available.contains(format) {
                anyhow::bail!("Cached {} report not found under {}", format, root.display());
            }
        }
        requested.to_vec()
    };

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;

    let mut copied = Vec::new();
    for format in formats {
        let source = root.join(format.file_name());
        let destination = out.join(format.file_name());
        if source != destination {
            fs::copy(&source, &destination).with_context(|| {
                format!("failed to copy {} to {}", source.display(), destination.display())
            })?;
        }
        copied.push(destination);
    }
    Ok(copied)
}

// =============================================================================
// Terminal summary
// =============================================================================

/// Print a short colored summary of a run.
pub fn print_summary(result: &PipelineResult) {
    println!();
    print!("  ");
    print!("{}", "vocabcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Sources:  ".dimmed());
    println!("{} files, {} facts", result.sources.files.len(), result.fact_count);
    print!("  {}", "Terms:    ".dimmed());
    println!(
        "{} ({} external)",
        result.extraction.terms.len(),
        result.extraction.external_dependencies.len()
    );
    print!("  {}", "Links:    ".dimmed());
    println!(
        "{} relationships, {} workflows",
        result.extraction.relationships.len(),
        result.extraction.workflows.len()
    );
    println!();

    if !result.coherence.findings.is_empty() {
        println!(
            "  {} ({}):",
            "Findings".bold(),
            result.coherence.findings.len()
        );
        for finding in &result.coherence.findings {
            print!("    {:<32}", finding.rule.as_str().dimmed());
            print!("{}", finding.term.blue());
            println!("  {}", finding.conflict);
        }
        println!();
    }

    for path in &result.written {
        print!("  {}", "Report:   ".dimmed());
        println!("{}", path.display());
    }

    match result.coherence.severity {
        Severity::Clean => println!("  {}", "✓ CLEAN".green()),
        Severity::Incoherent => println!("  {}", "✗ INCOHERENT".red()),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherence::FindingRule;
    use crate::extract::TermKind;
    use tempfile::TempDir;

    fn sample() -> (DslExtractionResult, CoherenceResult) {
        let mut term = DslTerm::new("processdata", TermKind::Action);
        term.definition = "void ProcessData()".to_string();
        term.evidence = vec!["src/a.cpp:3".to_string(), "src/a.cpp:9".to_string()];
        term.aliases = vec!["ProcessData".to_string()];
        term.usage_count = 2;

        let mut rel = DslRelationship::new("processdata", "calls", "renderframe");
        rel.notes = "hot | path".to_string();
        rel.usage_count = 1;

        let extraction = DslExtractionResult {
            terms: vec![term],
            relationships: vec![rel],
            workflows: vec![Workflow {
                name: "processdata workflow".to_string(),
                steps: vec!["processdata calls renderframe".to_string()],
            }],
            extraction_notes: vec!["note one".to_string()],
            ..Default::default()
        };
        let coherence = CoherenceResult::from_findings(vec![Finding::new(
            FindingRule::HighUsageOrphan,
            "processdata",
            "High-usage term lacks relationships",
        )
        .with_example("src/a.cpp:3")]);
        (extraction, coherence)
    }

    fn config(formats: Vec<ReportFormat>) -> AnalysisConfig {
        let mut config = AnalysisConfig::new("/work/proj");
        config.formats = formats;
        config
    }

    #[test]
    fn test_markdown_sections() {
        let (extraction, coherence) = sample();
        let report = MarkdownReporter::with_timestamp("2026-01-01T00:00:00Z").render(
            &extraction,
            &coherence,
            &config(vec![ReportFormat::Markdown]),
        );

        assert!(report.json.is_empty());
        let md = &report.markdown;
        assert!(md.starts_with("# DSL Extraction Report\n"));
        assert!(md.contains("| Generated On | 2026-01-01T00:00:00Z |"));
        assert!(md.contains("| Scope Notes | None |"));
        assert!(md.contains(
            "| processdata | Action | void ProcessData() | src/a.cpp:3<br>src/a.cpp:9 | ProcessData | 2 |"
        ));
        assert!(md.contains("| processdata | calls | renderframe |  | hot \\| path | 1 |"));
        assert!(md.contains("- processdata workflow\n  1. processdata calls renderframe\n"));
        assert!(md.contains("| high_usage_orphan | processdata |"));
        assert!(md.contains("## External Dependencies\n\n| Term | Kind"));
        assert!(md.contains("| None | - | - | - | - | - |"));
        assert!(md.ends_with("- note one\n"));
    }

    #[test]
    fn test_empty_extraction_renders_none_rows() {
        let report = MarkdownReporter::with_timestamp("t").render(
            &DslExtractionResult::default(),
            &CoherenceResult::new(),
            &config(vec![]),
        );
        assert!(report.markdown.contains("## Workflows\n\n- None\n"));
        assert!(report.markdown.ends_with("## Extraction Notes\n\n- None\n"));
    }

    #[test]
    fn test_json_document() {
        let (extraction, coherence) = sample();
        let report = MarkdownReporter::with_timestamp("t").render(
            &extraction,
            &coherence,
            &config(vec![ReportFormat::Json]),
        );
        assert!(report.markdown.is_empty());

        let value: serde_json::Value = serde_json::from_str(&report.json).unwrap();
        assert_eq!(value["analysis_header"]["source"], "/work/proj");
        assert_eq!(value["terms"][0]["name"], "processdata");
        assert_eq!(value["relationships"][0]["verb"], "calls");
        assert_eq!(value["incoherence_report"][0]["rule"], "high_usage_orphan");
        assert_eq!(value["severity"], "incoherent");
        assert_eq!(value["extraction_notes"][0], "note one");
    }

    #[test]
    fn test_write_and_copy_reports() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        let report = Report {
            markdown: "# md".to_string(),
            json: String::new(),
        };

        let written = write_reports(&root, &report).unwrap();
        assert_eq!(written, vec![root.join(MARKDOWN_REPORT_FILE)]);
        assert_eq!(available_reports(&root), vec![ReportFormat::Markdown]);

        let out = dir.path().join("out");
        let copied = copy_reports(&root, &out, &[]).unwrap();
        assert_eq!(copied, vec![out.join(MARKDOWN_REPORT_FILE)]);
        assert_eq!(fs::read_to_string(&copied[0]).unwrap(), "# md");

        let err = copy_reports(&root, &out, &[ReportFormat::Json]).unwrap_err();
        assert!(err.to_string().starts_with("Cached json report not found under"));
    }

    #[test]
    fn test_copy_without_reports_fails() {
        let dir = TempDir::new().unwrap();
        let err = copy_reports(dir.path(), dir.path(), &[]).unwrap_err();
        assert!(err.to_string().starts_with("No cached reports found under"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(ReportFormat::parse("Markdown"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("html"), None);
    }
}
