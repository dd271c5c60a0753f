//! Content-record validation.
//!
//! The validator never fails and never panics on malformed input. It walks
//! the whole document and returns every deviation it finds, so a caller can
//! decide whether partial content is still usable.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::number::NumerologyNumber;
use crate::record::{GenerationInfo, NumerologyContentRecord, DATE_FORMAT};
use crate::schema::RecordSchema;

const FIELD_NUMBER: &str = "number";
const FIELD_GENERATION_INFO: &str = "generation_info";
const META_FIELDS: [&str; 4] = ["date", "time_context", "theme", "batch_size"];

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record cannot be accepted.
    Error,
    /// The record is usable but something looks off.
    Warning,
}

/// What kind of deviation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedJson,
    NotAnObject,
    MissingField,
    WrongType,
    NumberOutOfRange,
    EmptyEntry,
    NonStringEntry,
    BatchSizeMismatch,
    UnknownCategory,
    UnknownField,
    MissingCategory,
    EmptyCategory,
    DuplicateEntry,
    UnknownMetadataField,
    UnexpectedTimeContext,
    UnparsableDate,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MalformedJson
            | Self::NotAnObject
            | Self::MissingField
            | Self::WrongType
            | Self::NumberOutOfRange
            | Self::EmptyEntry
            | Self::NonStringEntry => Severity::Error,
            Self::BatchSizeMismatch
            | Self::UnknownCategory
            | Self::UnknownField
            | Self::MissingCategory
            | Self::EmptyCategory
            | Self::DuplicateEntry
            | Self::UnknownMetadataField
            | Self::UnexpectedTimeContext
            | Self::UnparsableDate => Severity::Warning,
        }
    }
}

/// One deviation from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Dotted path to the offending field, e.g. `generation_info.theme` or
    /// `insight[3]`. Empty for document-level issues.
    pub field: String,
    pub message: String,
}

impl Issue {
    fn new(kind: IssueKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Overall outcome of a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    ValidWithWarnings,
    Invalid,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidWithWarnings => "valid with warnings",
            Self::Invalid => "invalid",
        }
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub issues: Vec<Issue>,
    /// The typed record; present unless the status is `Invalid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<NumerologyContentRecord>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<Issue>, record: Option<NumerologyContentRecord>) -> Self {
        let status = if issues.iter().any(|i| i.severity == Severity::Error) {
            ValidationStatus::Invalid
        } else if issues.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::ValidWithWarnings
        };

        let record = match status {
            ValidationStatus::Invalid => None,
            _ => record,
        };

        Self {
            status,
            issues,
            record,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Whether an issue of `kind` was reported on `field`.
    pub fn has_issue(&self, kind: IssueKind, field: &str) -> bool {
        self.issues.iter().any(|i| i.kind == kind && i.field == field)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn meta_path(field: &str) -> String {
    format!("{FIELD_GENERATION_INFO}.{field}")
}

/// Checks documents against a [`RecordSchema`].
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    schema: RecordSchema,
}

impl RecordValidator {
    pub fn new(schema: RecordSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Validate raw JSON text. Unparsable text is reported as `MalformedJson`.
    pub fn validate_str(&self, text: &str) -> ValidationResult {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => self.validate(&value),
            Err(e) => ValidationResult::from_issues(
                vec![Issue::new(
                    IssueKind::MalformedJson,
                    "",
                    format!("not valid JSON: {e}"),
                )],
                None,
            ),
        }
    }

    /// Validate a parsed JSON document.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        let mut issues = Vec::new();

        let Some(object) = value.as_object() else {
            issues.push(Issue::new(
                IssueKind::NotAnObject,
                "",
                format!("expected a JSON object, found {}", json_type(value)),
            ));
            return ValidationResult::from_issues(issues, None);
        };

        let number = self.check_number(object.get(FIELD_NUMBER), &mut issues);
        let info = self.check_generation_info(object.get(FIELD_GENERATION_INFO), &mut issues);
        let (categories, extra) = self.check_categories(object, &mut issues);

        if let Some(info) = &info {
            self.check_batch_size(info.batch_size, &categories, &mut issues);
        }

        let record = match (number, info) {
            (Some(number), Some(generation_info)) => Some(NumerologyContentRecord {
                number,
                generation_info,
                categories,
                extra,
            }),
            _ => None,
        };

        let result = ValidationResult::from_issues(issues, record);
        tracing::trace!(
            status = result.status.as_str(),
            issues = result.issues.len(),
            "validated record"
        );
        result
    }

    fn check_number(&self, value: Option<&Value>, issues: &mut Vec<Issue>) -> Option<NumerologyNumber> {
        let Some(value) = value else {
            issues.push(Issue::new(
                IssueKind::MissingField,
                FIELD_NUMBER,
                "required field 'number' is missing",
            ));
            return None;
        };

        let out_of_range = |shown: String| {
            Issue::new(
                IssueKind::NumberOutOfRange,
                FIELD_NUMBER,
                format!("number {shown} is not one of the allowed values {:?}", self.schema.allowed_numbers),
            )
        };

        if let Some(n) = value.as_u64() {
            match u32::try_from(n).ok().and_then(|n| NumerologyNumber::new(n, &self.schema.allowed_numbers)) {
                Some(number) => return Some(number),
                None => issues.push(out_of_range(n.to_string())),
            }
        } else if let Some(n) = value.as_i64() {
            issues.push(out_of_range(n.to_string()));
        } else {
            issues.push(Issue::new(
                IssueKind::WrongType,
                FIELD_NUMBER,
                format!("'number' must be an integer, found {}", json_type(value)),
            ));
        }
        None
    }

    fn check_generation_info(&self, value: Option<&Value>, issues: &mut Vec<Issue>) -> Option<GenerationInfo> {
        let Some(value) = value else {
            issues.push(Issue::new(
                IssueKind::MissingField,
                FIELD_GENERATION_INFO,
                "required field 'generation_info' is missing",
            ));
            return None;
        };

        let Some(meta) = value.as_object() else {
            issues.push(Issue::new(
                IssueKind::WrongType,
                FIELD_GENERATION_INFO,
                format!("'generation_info' must be an object, found {}", json_type(value)),
            ));
            return None;
        };

        let date = self.meta_string(meta, "date", issues);
        let time_context = self.meta_string(meta, "time_context", issues);
        let theme = self.meta_string(meta, "theme", issues);
        let batch_size = self.meta_batch_size(meta, issues);

        if let Some(date) = &date {
            if chrono::NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).is_err() {
                issues.push(Issue::new(
                    IssueKind::UnparsableDate,
                    meta_path("date"),
                    format!("date '{date}' is not a YYYY-MM-DD calendar date"),
                ));
            }
        }

        if let Some(context) = &time_context {
            if !self.schema.expects_time_context(context) {
                issues.push(Issue::new(
                    IssueKind::UnexpectedTimeContext,
                    meta_path("time_context"),
                    format!(
                        "time_context '{context}' is not one of {:?}",
                        self.schema.time_contexts
                    ),
                ));
            }
        }

        let mut extra = BTreeMap::new();
        for (key, v) in meta {
            if !META_FIELDS.contains(&key.as_str()) {
                issues.push(Issue::new(
                    IssueKind::UnknownMetadataField,
                    meta_path(key),
                    format!("unrecognized generation_info field '{key}'"),
                ));
                extra.insert(key.clone(), v.clone());
            }
        }

        Some(GenerationInfo {
            date: date?,
            time_context: time_context?,
            theme: theme?,
            batch_size: batch_size?,
            extra,
        })
    }

    fn meta_string(&self, meta: &Map<String, Value>, field: &str, issues: &mut Vec<Issue>) -> Option<String> {
        match meta.get(field) {
            None => {
                issues.push(Issue::new(
                    IssueKind::MissingField,
                    meta_path(field),
                    format!("required field 'generation_info.{field}' is missing"),
                ));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                issues.push(Issue::new(
                    IssueKind::WrongType,
                    meta_path(field),
                    format!("'generation_info.{field}' must be a string, found {}", json_type(other)),
                ));
                None
            }
        }
    }

    fn meta_batch_size(&self, meta: &Map<String, Value>, issues: &mut Vec<Issue>) -> Option<u64> {
        match meta.get("batch_size") {
            None => {
                issues.push(Issue::new(
                    IssueKind::MissingField,
                    meta_path("batch_size"),
                    "required field 'generation_info.batch_size' is missing",
                ));
                None
            }
            Some(v) => match v.as_u64() {
                Some(n) => Some(n),
                None => {
                    issues.push(Issue::new(
                        IssueKind::WrongType,
                        meta_path("batch_size"),
                        format!(
                            "'generation_info.batch_size' must be a non-negative integer, found {}",
                            if v.is_i64() { "negative integer" } else { json_type(v) }
                        ),
                    ));
                    None
                }
            },
        }
    }

    /// Check every top-level field other than `number` and `generation_info`.
    ///
    /// Returns the fields that are arrays of strings, then every unrecognized
    /// field that is not an array.
    fn check_categories(
        &self,
        object: &Map<String, Value>,
        issues: &mut Vec<Issue>,
    ) -> (BTreeMap<String, Vec<String>>, BTreeMap<String, Value>) {
        for name in &self.schema.categories {
            if !object.contains_key(name) {
                issues.push(Issue::new(
                    IssueKind::MissingCategory,
                    name.as_str(),
                    format!("category '{name}' is missing"),
                ));
            }
        }

        let mut categories = BTreeMap::new();
        let mut extra = BTreeMap::new();

        for (key, value) in object {
            if key == FIELD_NUMBER || key == FIELD_GENERATION_INFO {
                continue;
            }

            let known = self.schema.is_known_category(key);

            let Some(items) = value.as_array() else {
                if known {
                    issues.push(Issue::new(
                        IssueKind::WrongType,
                        key.as_str(),
                        format!("category '{key}' must be an array of strings, found {}", json_type(value)),
                    ));
                } else {
                    issues.push(Issue::new(
                        IssueKind::UnknownField,
                        key.as_str(),
                        format!("unrecognized field '{key}' holds {}", json_type(value)),
                    ));
                    extra.insert(key.clone(), value.clone());
                }
                continue;
            };

            if !known {
                issues.push(Issue::new(
                    IssueKind::UnknownCategory,
                    key.as_str(),
                    format!("unrecognized category '{key}'"),
                ));
            }

            if let Some(entries) = self.check_entries(key, items, issues) {
                categories.insert(key.clone(), entries);
            }
        }

        (categories, extra)
    }

    fn check_entries(&self, category: &str, items: &[Value], issues: &mut Vec<Issue>) -> Option<Vec<String>> {
        if items.is_empty() {
            issues.push(Issue::new(
                IssueKind::EmptyCategory,
                category,
                format!("category '{category}' has no entries"),
            ));
            return Some(Vec::new());
        }

        let mut entries = Vec::with_capacity(items.len());
        let mut all_strings = true;
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for (index, item) in items.iter().enumerate() {
            let path = format!("{category}[{index}]");
            match item {
                Value::String(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        issues.push(Issue::new(IssueKind::EmptyEntry, path, "entry is empty"));
                    } else if self.schema.flag_duplicates {
                        if let Some(first) = first_seen.get(trimmed) {
                            issues.push(Issue::new(
                                IssueKind::DuplicateEntry,
                                path,
                                format!("entry repeats {category}[{first}]"),
                            ));
                        } else {
                            first_seen.insert(trimmed, index);
                        }
                    }
                    entries.push(text.clone());
                }
                other => {
                    all_strings = false;
                    issues.push(Issue::new(
                        IssueKind::NonStringEntry,
                        path,
                        format!("entry must be a string, found {}", json_type(other)),
                    ));
                }
            }
        }

        all_strings.then_some(entries)
    }

    fn check_batch_size(&self, declared: u64, categories: &BTreeMap<String, Vec<String>>, issues: &mut Vec<Issue>) {
        if !self.schema.check_batch_size || categories.is_empty() {
            return;
        }

        let differing: Vec<String> = categories
            .iter()
            .filter(|(_, entries)| entries.len() as u64 != declared)
            .map(|(name, entries)| format!("{name}={}", entries.len()))
            .collect();

        if differing.is_empty() {
            return;
        }

        issues.push(Issue::new(
            IssueKind::BatchSizeMismatch,
            meta_path("batch_size"),
            format!(
                "batch_size declares {declared} but {} of {} category arrays differ ({})",
                differing.len(),
                categories.len(),
                differing.join(", ")
            ),
        ));
    }
}

/// Validate with the default schema.
pub fn validate(record: &Value) -> ValidationResult {
    RecordValidator::default().validate(record)
}

/// Validate raw JSON text with the default schema.
pub fn validate_str(text: &str) -> ValidationResult {
    RecordValidator::default().validate_str(text)
}

/// Validate against a specific schema.
pub fn validate_with(record: &Value, schema: &RecordSchema) -> ValidationResult {
    RecordValidator::new(schema.clone()).validate(record)
}
