//! Check command implementation.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint};
use numera_common_log::spans::{corpus_span, Timer};
use numera_content::{Corpus, CorpusReport, FileKind, FileOutcome, NumberCoverage, Severity};
use serde::Serialize;
use tracing::Instrument;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::icons::IconContext;
use crate::output::{print_output, FormattedOutput};

/// Scan a content directory
#[derive(Debug, Parser)]
pub struct CheckCommand {
    /// Content directory (default: NUMERA_CONTENT_ROOT, then corpus.root)
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// List every file, not only those with issues
    #[arg(long)]
    pub all: bool,
}

/// One line of the check output.
#[derive(Debug, Serialize)]
pub struct CheckedFile {
    pub path: PathBuf,
    pub kind: FileKind,
    /// `valid`, `valid with warnings`, `invalid`, `clean`, `findings`,
    /// `untitled` or `unreadable`.
    pub status: &'static str,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckedFile {
    fn from_report(root: &Path, kind: FileKind, path: &Path, outcome: &FileOutcome) -> Self {
        let path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        match outcome {
            FileOutcome::Record(result) => Self {
                path,
                kind,
                status: result.status.as_str(),
                errors: result.errors().count(),
                warnings: result.warnings().count(),
                detail: result.errors().next().map(|i| format!("{}: {}", i.field, i.message)),
            },
            FileOutcome::Essay { outline, parse_warnings } => {
                let untitled = parse_warnings
                    .iter()
                    .any(|w| w.severity == numera_content::WarningSeverity::Error);
                Self {
                    path,
                    kind,
                    status: if untitled {
                        "untitled"
                    } else if outline.is_clean() {
                        "clean"
                    } else {
                        "findings"
                    },
                    errors: usize::from(untitled),
                    warnings: outline.warnings().count(),
                    detail: None,
                }
            }
            FileOutcome::Unreadable { error } => Self {
                path,
                kind,
                status: "unreadable",
                errors: 1,
                warnings: 0,
                detail: Some(error.clone()),
            },
        }
    }

    fn has_issues(&self) -> bool {
        self.errors > 0 || self.warnings > 0
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub root: PathBuf,
    pub records_total: usize,
    pub records_valid: usize,
    pub records_with_warnings: usize,
    pub records_invalid: usize,
    pub records_unreadable: usize,
    pub essays_total: usize,
    pub essays_clean: usize,
    pub essays_with_findings: usize,
    pub essays_untitled: usize,
    pub essays_unreadable: usize,
    pub accepted_entries: usize,
    pub coverage: BTreeMap<u32, NumberCoverage>,
    /// Numbers lacking a record or an essay.
    pub incomplete_numbers: Vec<u32>,
    pub files: Vec<CheckedFile>,
    #[serde(skip)]
    show_all: bool,
}

impl CheckOutput {
    fn new(report: &CorpusReport, show_all: bool) -> Self {
        let s = &report.summary;
        Self {
            root: report.root.clone(),
            records_total: s.records_total(),
            records_valid: s.records_valid,
            records_with_warnings: s.records_with_warnings,
            records_invalid: s.records_invalid,
            records_unreadable: s.records_unreadable,
            essays_total: s.essays_total(),
            essays_clean: s.essays_clean,
            essays_with_findings: s.essays_with_findings,
            essays_untitled: s.essays_untitled,
            essays_unreadable: s.essays_unreadable,
            accepted_entries: report.accepted_records().map(|r| r.total_entries()).sum(),
            coverage: s.coverage.clone(),
            incomplete_numbers: s.incomplete_numbers().map(|(n, _)| n).collect(),
            files: report
                .files
                .iter()
                .map(|f| CheckedFile::from_report(&report.root, f.kind, &f.path, &f.outcome))
                .collect(),
            show_all,
        }
    }
}

impl FormattedOutput for CheckOutput {
    fn format_text(&self) -> String {
        let icons = IconContext::new();
        let mut out = String::new();

        let _ = writeln!(out, "Content directory: {}", self.root.display());
        let _ = writeln!(
            out,
            "Records: {} total, {} valid, {} with warnings, {} invalid, {} unreadable",
            self.records_total,
            self.records_valid,
            self.records_with_warnings,
            self.records_invalid,
            self.records_unreadable
        );
        let _ = writeln!(
            out,
            "Essays:  {} total, {} clean, {} with findings, {} untitled, {} unreadable",
            self.essays_total,
            self.essays_clean,
            self.essays_with_findings,
            self.essays_untitled,
            self.essays_unreadable
        );
        let _ = writeln!(out, "Accepted entries: {}", self.accepted_entries);

        let listed: Vec<&CheckedFile> = self
            .files
            .iter()
            .filter(|f| self.show_all || f.has_issues())
            .collect();
        if !listed.is_empty() {
            out.push('\n');
            for file in listed {
                let icon = if file.errors > 0 {
                    icons.severity(Severity::Error)
                } else if file.warnings > 0 {
                    icons.severity(Severity::Warning)
                } else {
                    icons.check()
                };
                let _ = write!(out, "{icon} {}: {}", file.path.display(), file.status);
                if let Some(detail) = &file.detail {
                    let _ = write!(out, " ({detail})");
                }
                out.push('\n');
            }
        }

        let _ = writeln!(out, "\nCoverage:");
        for (number, coverage) in &self.coverage {
            let icon = if coverage.is_complete() { icons.check() } else { icons.warning() };
            let _ = writeln!(
                out,
                "  {icon} {number:>2}: {} record(s), {} essay(s)",
                coverage.records, coverage.essays
            );
        }
        if !self.incomplete_numbers.is_empty() {
            let numbers: Vec<String> = self.incomplete_numbers.iter().map(u32::to_string).collect();
            let _ = writeln!(out, "Incomplete: {}", numbers.join(", "));
        }
        out
    }
}

impl CheckCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let root = ctx.content_root(self.root.as_deref());
        let span = corpus_span(&root.display().to_string());

        let report = async {
            let timer = Timer::start("check");
            let corpus = Corpus::discover_with(&root, &ctx.config.corpus).await?;
            if corpus.is_empty() {
                tracing::warn!("no record or essay files found");
            }
            let report = corpus.scan(&ctx.schema(), &ctx.outline_rules()).await;
            if report.has_unreadable_files() {
                tracing::warn!("some content files could not be read");
            }
            timer.finish();
            Ok::<_, CliError>(report)
        }
        .instrument(span)
        .await?;

        print_output(ctx, &CheckOutput::new(&report, self.all))?;

        if report.has_invalid_records() {
            return Err(CliError::validation(
                report.summary.records_invalid,
                report.summary.records_total(),
                "record file(s)",
            ));
        }
        Ok(())
    }
}
