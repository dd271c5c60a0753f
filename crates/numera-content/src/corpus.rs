//! Content directory discovery and scanning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use numera_common_config::CorpusConfig;
use serde::{Deserialize, Serialize};
use tokio::fs;
use walkdir::WalkDir;

use crate::essay::{EssayParser, ParseWarning, WarningSeverity};
use crate::outline::{lint_essay, OutlineReport, OutlineRules};
use crate::record::NumerologyContentRecord;
use crate::schema::RecordSchema;
use crate::validation::{RecordValidator, ValidationResult, ValidationStatus};

/// Files found under a content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub root: PathBuf,
    /// Record files, sorted by path.
    pub records: Vec<PathBuf>,
    /// Essay files, sorted by path.
    pub essays: Vec<PathBuf>,
    /// Entries the walk could not read.
    pub skipped: Vec<SkippedPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedPath {
    pub path: Option<PathBuf>,
    pub reason: String,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

impl Corpus {
    /// Discover a corpus using the default file extensions.
    pub async fn discover(root: &Path) -> Result<Self, CorpusError> {
        Self::discover_with(root, &CorpusConfig::default()).await
    }

    /// Discover a corpus using the extensions and link policy in `config`.
    ///
    /// `config.root` is ignored in favour of `root`.
    pub async fn discover_with(root: &Path, config: &CorpusConfig) -> Result<Self, CorpusError> {
        if !fs::try_exists(root).await? {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        if !fs::metadata(root).await?.is_dir() {
            return Err(CorpusError::NotADirectory(root.to_path_buf()));
        }

        let walk_root = root.to_path_buf();
        let record_ext = config.record_extension.clone();
        let essay_ext = config.essay_extension.clone();
        let follow_links = config.follow_links;

        let corpus = tokio::task::spawn_blocking(move || {
            let mut corpus = Corpus {
                root: walk_root.clone(),
                records: Vec::new(),
                essays: Vec::new(),
                skipped: Vec::new(),
            };

            for entry in WalkDir::new(&walk_root).follow_links(follow_links) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        corpus.skipped.push(SkippedPath {
                            path: e.path().map(Path::to_path_buf),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let path = entry.into_path();
                if has_extension(&path, &record_ext) {
                    corpus.records.push(path);
                } else if has_extension(&path, &essay_ext) {
                    corpus.essays.push(path);
                }
            }

            corpus.records.sort();
            corpus.essays.sort();
            corpus
        })
        .await
        .map_err(|e| CorpusError::Walk(e.to_string()))?;

        tracing::debug!(
            root = %root.display(),
            records = corpus.records.len(),
            essays = corpus.essays.len(),
            skipped = corpus.skipped.len(),
            "discovered corpus"
        );

        Ok(corpus)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.essays.is_empty()
    }

    /// Read and check every discovered file.
    ///
    /// Files are processed one at a time. A file that cannot be read is
    /// reported and the scan continues.
    pub async fn scan(&self, schema: &RecordSchema, rules: &OutlineRules) -> CorpusReport {
        let validator = RecordValidator::new(schema.clone());
        let parser = EssayParser::new();
        let mut files = Vec::with_capacity(self.records.len() + self.essays.len());

        for path in &self.records {
            let outcome = match fs::read_to_string(path).await {
                Ok(text) => {
                    let result = validator.validate_str(&text);
                    if result.status == ValidationStatus::Invalid {
                        tracing::warn!(path = %path.display(), "skipping invalid record");
                    }
                    FileOutcome::Record(result)
                }
                Err(e) => Self::unreadable(path, e),
            };
            files.push(FileReport {
                path: path.clone(),
                kind: FileKind::Record,
                outcome,
            });
        }

        for path in &self.essays {
            let outcome = match fs::read_to_string(path).await {
                Ok(text) => {
                    let parsed = parser.parse_safe(&text);
                    FileOutcome::Essay {
                        outline: lint_essay(&parsed, rules),
                        parse_warnings: parsed.warnings,
                    }
                }
                Err(e) => Self::unreadable(path, e),
            };
            files.push(FileReport {
                path: path.clone(),
                kind: FileKind::Essay,
                outcome,
            });
        }

        let unreadable_entries = self.skipped.iter().map(|s| FileReport {
            path: s.path.clone().unwrap_or_else(|| self.root.clone()),
            kind: FileKind::Other,
            outcome: FileOutcome::Unreadable {
                error: s.reason.clone(),
            },
        });
        files.extend(unreadable_entries);

        let summary = CorpusSummary::tally(&files, &schema.allowed_numbers);
        tracing::info!(
            root = %self.root.display(),
            records = summary.records_total(),
            invalid = summary.records_invalid,
            essays = summary.essays_total(),
            "scanned corpus"
        );

        CorpusReport {
            root: self.root.clone(),
            files,
            summary,
        }
    }

    fn unreadable(path: &Path, error: std::io::Error) -> FileOutcome {
        tracing::warn!(path = %path.display(), error = %error, "could not read file");
        FileOutcome::Unreadable {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Record,
    Essay,
    /// A walk entry that could not be classified.
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Record(ValidationResult),
    Essay {
        outline: OutlineReport,
        parse_warnings: Vec<ParseWarning>,
    },
    Unreadable {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: FileKind,
    pub outcome: FileOutcome,
}

/// Which content exists for one number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberCoverage {
    /// Accepted records.
    pub records: usize,
    /// Essays whose title names the number.
    pub essays: usize,
}

impl NumberCoverage {
    pub fn is_complete(&self) -> bool {
        self.records > 0 && self.essays > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub records_valid: usize,
    pub records_with_warnings: usize,
    pub records_invalid: usize,
    pub records_unreadable: usize,
    pub essays_clean: usize,
    pub essays_with_findings: usize,
    /// Essays without a title heading.
    pub essays_untitled: usize,
    pub essays_unreadable: usize,
    /// Walk entries that could not be read.
    pub other_unreadable: usize,
    /// Keyed by every allowed number, plus any other number an essay names.
    pub coverage: BTreeMap<u32, NumberCoverage>,
}

impl CorpusSummary {
    fn tally(files: &[FileReport], allowed_numbers: &[u32]) -> Self {
        let mut summary = Self {
            coverage: allowed_numbers
                .iter()
                .map(|n| (*n, NumberCoverage::default()))
                .collect(),
            ..Self::default()
        };

        for file in files {
            match (&file.outcome, file.kind) {
                (FileOutcome::Record(result), _) => {
                    match result.status {
                        ValidationStatus::Valid => summary.records_valid += 1,
                        ValidationStatus::ValidWithWarnings => summary.records_with_warnings += 1,
                        ValidationStatus::Invalid => summary.records_invalid += 1,
                    }
                    if let Some(record) = &result.record {
                        summary.coverage.entry(record.number.value()).or_default().records += 1;
                    }
                }
                (FileOutcome::Essay { outline, parse_warnings }, _) => {
                    let untitled = parse_warnings
                        .iter()
                        .any(|w| w.severity == WarningSeverity::Error);
                    if untitled {
                        summary.essays_untitled += 1;
                    } else if outline.is_clean() {
                        summary.essays_clean += 1;
                    } else {
                        summary.essays_with_findings += 1;
                    }
                    if let Some(n) = outline.number {
                        summary.coverage.entry(n).or_default().essays += 1;
                    }
                }
                (FileOutcome::Unreadable { .. }, FileKind::Record) => summary.records_unreadable += 1,
                (FileOutcome::Unreadable { .. }, FileKind::Essay) => summary.essays_unreadable += 1,
                (FileOutcome::Unreadable { .. }, FileKind::Other) => summary.other_unreadable += 1,
            }
        }

        summary
    }

    pub fn records_total(&self) -> usize {
        self.records_valid + self.records_with_warnings + self.records_invalid + self.records_unreadable
    }

    pub fn essays_total(&self) -> usize {
        self.essays_clean + self.essays_with_findings + self.essays_untitled + self.essays_unreadable
    }

    /// Numbers lacking a record or an essay.
    pub fn incomplete_numbers(&self) -> impl Iterator<Item = (u32, NumberCoverage)> + '_ {
        self.coverage
            .iter()
            .filter(|(_, c)| !c.is_complete())
            .map(|(n, c)| (*n, *c))
    }
}

/// Outcome of [`Corpus::scan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
    pub summary: CorpusSummary,
}

impl CorpusReport {
    /// Records that passed validation, warnings allowed, in path order.
    pub fn accepted_records(&self) -> impl Iterator<Item = &NumerologyContentRecord> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Record(result) => result.record.as_ref(),
            _ => None,
        })
    }

    pub fn has_invalid_records(&self) -> bool {
        self.summary.records_invalid > 0
    }

    pub fn has_unreadable_files(&self) -> bool {
        self.summary.records_unreadable + self.summary.essays_unreadable + self.summary.other_unreadable > 0
    }
}

/// Errors for corpus discovery.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Content directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Directory walk failed: {0}")]
    Walk(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
