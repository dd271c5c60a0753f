//! Lint command implementation.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint};
use numera_common_log::spans::file_span;
use numera_content::{lint_essay, EssayParser, OutlineFinding, OutlineRules, ParseWarning};
use serde::Serialize;
use tracing::Instrument;

use super::read_file;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::icons::IconContext;
use crate::output::{print_output, FormattedOutput};

/// Lint essay outlines
#[derive(Debug, Parser)]
pub struct LintCommand {
    /// Markdown essays to lint
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct EssayLint {
    pub path: PathBuf,
    pub title: Option<String>,
    pub number: Option<u32>,
    pub sections: usize,
    pub findings: Vec<OutlineFinding>,
    pub parse_warnings: Vec<ParseWarning>,
    /// Why the essay could not be linted at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LintReport {
    pub essays: Vec<EssayLint>,
    pub failed: usize,
}

impl FormattedOutput for LintReport {
    fn format_text(&self) -> String {
        let icons = IconContext::new();
        let mut out = String::new();

        for essay in &self.essays {
            if let Some(error) = &essay.error {
                let _ = writeln!(out, "{} {}: {error}", icons.cross(), essay.path.display());
                continue;
            }

            let icon = if essay.findings.is_empty() { icons.check() } else { icons.warning() };
            let _ = writeln!(
                out,
                "{icon} {}: {} ({} sections, {} findings)",
                essay.path.display(),
                essay.title.as_deref().unwrap_or_default(),
                essay.sections,
                essay.findings.len()
            );
            for warning in &essay.parse_warnings {
                let _ = writeln!(out, "    {} line {}: {}", icons.info(), warning.line + 1, warning.message);
            }
            for finding in &essay.findings {
                let location = finding.line.map(|l| format!("line {}: ", l + 1)).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "    {} {location}{}",
                    icons.lint_severity(finding.severity),
                    finding.message
                );
            }
        }

        let _ = write!(out, "\n{} essay(s) linted, {} failed", self.essays.len(), self.failed);
        out
    }
}

impl LintCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let parser = EssayParser::new();
        let rules = ctx.outline_rules();
        let mut essays = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let span = file_span("lint", &path.display().to_string());
            essays.push(lint_one(&parser, &rules, path).instrument(span).await);
        }

        let failed = essays.iter().filter(|e| e.error.is_some()).count();
        let report = LintReport { essays, failed };
        print_output(ctx, &report)?;

        if failed > 0 {
            return Err(CliError::validation(failed, report.essays.len(), "essay(s)"));
        }
        Ok(())
    }
}

async fn lint_one(parser: &EssayParser, rules: &OutlineRules, path: &Path) -> EssayLint {
    let mut essay = EssayLint {
        path: path.to_path_buf(),
        title: None,
        number: None,
        sections: 0,
        findings: Vec::new(),
        parse_warnings: Vec::new(),
        error: None,
    };

    let text = match read_file(path).await {
        Ok(text) => text,
        Err(e) => {
            essay.error = Some(e.to_string());
            return essay;
        }
    };

    match parser.parse(&text) {
        Ok(parsed) => {
            let report = lint_essay(&parsed, rules);
            essay.title = Some(parsed.title);
            essay.number = parsed.number;
            essay.sections = parsed.sections.len();
            essay.findings = report.findings;
            essay.parse_warnings = parsed.warnings;
        }
        Err(e) => {
            tracing::warn!(error = %e, "essay has no title");
            essay.error = Some(e.to_string());
        }
    }
    essay
}
