//! Validate command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use numera_common_log::spans::{file_span, record_span, Timer};
use numera_content::{Issue, RecordValidator, ValidationStatus};
use serde::Serialize;
use tracing::Instrument;

use super::read_file;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::icons::IconContext;
use crate::output::{print_output, FormattedOutput};

/// Validate content record files
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    /// Record files to validate
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct FileValidation {
    pub path: PathBuf,
    /// Absent when the file could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ValidationStatus>,
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileValidation {
    fn passed(&self, strict: bool) -> bool {
        match self.status {
            Some(ValidationStatus::Valid) => true,
            Some(ValidationStatus::ValidWithWarnings) => !strict,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateReport {
    pub strict: bool,
    pub passed: usize,
    pub failed: usize,
    pub files: Vec<FileValidation>,
}

impl FormattedOutput for ValidateReport {
    fn format_text(&self) -> String {
        let icons = IconContext::new();
        let mut out = String::new();

        for file in &self.files {
            match (&file.status, &file.error) {
                (Some(status), _) => {
                    let _ = writeln!(
                        out,
                        "{} {}: {}",
                        icons.status(*status),
                        file.path.display(),
                        status.as_str()
                    );
                }
                (None, Some(error)) => {
                    let _ = writeln!(out, "{} {}: {error}", icons.cross(), file.path.display());
                }
                (None, None) => {}
            }
            for issue in &file.issues {
                let field = if issue.field.is_empty() { "(document)" } else { issue.field.as_str() };
                let _ = writeln!(out, "    {} {field}: {}", icons.severity(issue.severity), issue.message);
            }
        }

        let _ = write!(
            out,
            "\n{} of {} record file(s) passed{}",
            self.passed,
            self.files.len(),
            if self.strict { " (strict)" } else { "" }
        );
        out
    }
}

impl ValidateCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let timer = Timer::start("validate");
        let validator = RecordValidator::new(ctx.schema());
        let mut files = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let span = file_span("validate", &path.display().to_string());
            let file = async {
                match read_file(path).await {
                    Ok(text) => {
                        let result = validator.validate_str(&text);
                        if let Some(record) = &result.record {
                            record_span(u64::from(record.number.value())).in_scope(|| {
                                tracing::debug!(entries = record.total_entries(), "record accepted");
                            });
                        }
                        FileValidation {
                            path: path.clone(),
                            status: Some(result.status),
                            issues: result.issues,
                            error: None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "unreadable record file");
                        FileValidation {
                            path: path.clone(),
                            status: None,
                            issues: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
            .instrument(span)
            .await;
            files.push(file);
        }

        let passed = files.iter().filter(|f| f.passed(self.strict)).count();
        let report = ValidateReport {
            strict: self.strict,
            passed,
            failed: files.len() - passed,
            files,
        };
        timer.finish();

        print_output(ctx, &report)?;

        if report.failed > 0 {
            return Err(CliError::validation(report.failed, report.files.len(), "record file(s)"));
        }
        Ok(())
    }
}
