//! Outline lint for essays.
//!
//! Findings are advisory. Nothing reported here makes an essay unusable.

use numera_common_config::NumeraConfig;
use serde::{Deserialize, Serialize};

use crate::essay::ParsedEssay;

/// What an essay outline is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineRules {
    /// Section names in their conventional order.
    pub expected_sections: Vec<String>,
    /// Report sections that appear out of the conventional order.
    pub require_order: bool,
    /// Numbers an essay title may name.
    pub allowed_numbers: Vec<u32>,
}

impl OutlineRules {
    pub fn from_config(config: &NumeraConfig) -> Self {
        Self {
            expected_sections: config.essays.expected_sections.clone(),
            require_order: config.essays.require_order,
            allowed_numbers: config.schema.allowed_numbers.clone(),
        }
    }
}

impl Default for OutlineRules {
    fn default() -> Self {
        Self::from_config(&NumeraConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingSection,
    UnknownSection,
    OutOfOrder,
    DuplicateSection,
    NumberingGap,
    EmptySection,
    NumberNotRecognized,
}

impl FindingKind {
    pub fn severity(&self) -> LintSeverity {
        match self {
            Self::UnknownSection | Self::NumberingGap => LintSeverity::Info,
            _ => LintSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineFinding {
    pub kind: FindingKind,
    pub severity: LintSeverity,
    /// Source line, when the finding points at a heading.
    pub line: Option<usize>,
    pub message: String,
}

impl OutlineFinding {
    fn new(kind: FindingKind, line: Option<usize>, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            line,
            message,
        }
    }
}

/// Lint outcome for one essay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineReport {
    pub title: String,
    pub number: Option<u32>,
    /// How many expected sections were found.
    pub matched_sections: usize,
    pub expected_sections: usize,
    pub findings: Vec<OutlineFinding>,
}

impl OutlineReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &OutlineFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == LintSeverity::Warning)
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }
}

/// Lower-case words with `&` spelled out and punctuation dropped.
fn normalize(name: &str) -> Vec<String> {
    name.replace('&', " and ")
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Index of the expected section a heading refers to.
///
/// A heading matches when it starts with all words of an expected name;
/// the longest such name wins.
fn match_expected(heading: &[String], expected: &[Vec<String>]) -> Option<usize> {
    expected
        .iter()
        .enumerate()
        .filter(|(_, words)| !words.is_empty() && heading.starts_with(words))
        .max_by_key(|(_, words)| words.len())
        .map(|(i, _)| i)
}

/// Compare an essay's outline with `rules`.
pub fn lint_essay(essay: &ParsedEssay, rules: &OutlineRules) -> OutlineReport {
    let mut findings = Vec::new();

    match essay.number {
        Some(n) if rules.allowed_numbers.contains(&n) => {}
        Some(n) => findings.push(OutlineFinding::new(
            FindingKind::NumberNotRecognized,
            Some(essay.title_line),
            format!("title names {n}, which is not an allowed number"),
        )),
        None => findings.push(OutlineFinding::new(
            FindingKind::NumberNotRecognized,
            Some(essay.title_line),
            format!("title '{}' names no number", essay.title),
        )),
    }

    let expected: Vec<Vec<String>> = rules.expected_sections.iter().map(|s| normalize(s)).collect();
    let mut first_seen: Vec<Option<usize>> = vec![None; expected.len()];
    let mut furthest: Option<usize> = None;
    let mut previous_ordinal = 0u32;

    for section in &essay.sections {
        let line = Some(section.line);

        if let Some(ordinal) = section.ordinal {
            if ordinal != previous_ordinal + 1 {
                findings.push(OutlineFinding::new(
                    FindingKind::NumberingGap,
                    line,
                    format!(
                        "section '{}' is numbered {ordinal}, expected {}",
                        section.name,
                        previous_ordinal + 1
                    ),
                ));
            }
            previous_ordinal = ordinal;
        }

        if section.word_count == 0 && section.subsections.is_empty() {
            findings.push(OutlineFinding::new(
                FindingKind::EmptySection,
                line,
                format!("section '{}' has no text", section.name),
            ));
        }

        let Some(index) = match_expected(&normalize(&section.name), &expected) else {
            findings.push(OutlineFinding::new(
                FindingKind::UnknownSection,
                line,
                format!("section '{}' is not part of the standard outline", section.name),
            ));
            continue;
        };

        if let Some(first) = first_seen[index] {
            findings.push(OutlineFinding::new(
                FindingKind::DuplicateSection,
                line,
                format!(
                    "section '{}' repeats '{}' from line {}",
                    section.name,
                    rules.expected_sections[index],
                    first + 1
                ),
            ));
            continue;
        }
        first_seen[index] = Some(section.line);

        if rules.require_order {
            match furthest {
                Some(max) if index < max => findings.push(OutlineFinding::new(
                    FindingKind::OutOfOrder,
                    line,
                    format!(
                        "section '{}' should come before '{}'",
                        section.name, rules.expected_sections[max]
                    ),
                )),
                _ => furthest = Some(index),
            }
        }
    }

    for (index, seen) in first_seen.iter().enumerate() {
        if seen.is_none() {
            findings.push(OutlineFinding::new(
                FindingKind::MissingSection,
                None,
                format!("section '{}' is missing", rules.expected_sections[index]),
            ));
        }
    }

    let matched_sections = first_seen.iter().filter(|s| s.is_some()).count();
    tracing::debug!(
        title = %essay.title,
        matched = matched_sections,
        findings = findings.len(),
        "linted essay outline"
    );

    OutlineReport {
        title: essay.title.clone(),
        number: essay.number,
        matched_sections,
        expected_sections: expected.len(),
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essay::EssayParser;
    use crate::number::DEFAULT_ALLOWED_NUMBERS;

    fn rules(sections: &[&str]) -> OutlineRules {
        OutlineRules {
            expected_sections: sections.iter().map(|s| s.to_string()).collect(),
            require_order: true,
            allowed_numbers: DEFAULT_ALLOWED_NUMBERS.to_vec(),
        }
    }

    fn lint(content: &str, rules: &OutlineRules) -> OutlineReport {
        lint_essay(&EssayParser::new().parse_safe(content), rules)
    }

    #[test]
    fn clean_outline() {
        let report = lint(
            "# Number 6\n### 1. Core Essence\nCare.\n### 2. Shadow & Light\nBoth.\n",
            &rules(&["Core Essence", "Shadow and Light"]),
        );
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.matched_sections, 2);
    }

    #[test]
    fn missing_and_out_of_order() {
        let report = lint(
            "# Number 6\n### 1. Rituals\nCandles.\n### 2. Core Essence\nCare.\n",
            &rules(&["Core Essence", "Archetype", "Rituals"]),
        );
        assert_eq!(report.count(FindingKind::MissingSection), 1);
        assert_eq!(report.count(FindingKind::OutOfOrder), 1);
        assert!(report.findings.iter().any(|f| f.message.contains("'Archetype' is missing")));
    }

    #[test]
    fn order_check_can_be_disabled() {
        let mut rules = rules(&["Core Essence", "Rituals"]);
        rules.require_order = false;
        let report = lint(
            "# Number 6\n### 1. Rituals\nCandles.\n### 2. Core Essence\nCare.\n",
            &rules,
        );
        assert!(report.is_clean());
    }

    #[test]
    fn heading_prefix_matches_longer_names() {
        let report = lint(
            "# Number 9\n### 1. Rituals and Practices for Nine\nLet go.\n",
            &rules(&["Rituals"]),
        );
        assert!(report.is_clean());
    }

    #[test]
    fn unknown_duplicate_and_empty() {
        let report = lint(
            "# Number 9\n### 1. Core Essence\nEnd.\n### 2. Core essence\nAgain.\n### 3. Tarot\n",
            &rules(&["Core Essence"]),
        );
        assert_eq!(report.count(FindingKind::DuplicateSection), 1);
        assert_eq!(report.count(FindingKind::UnknownSection), 1);
        assert_eq!(report.count(FindingKind::EmptySection), 1);
        // Unknown sections are informational only.
        assert_eq!(report.warnings().count(), 2);
    }

    #[test]
    fn numbering_gap() {
        let report = lint(
            "# Number 1\n### 1. Core Essence\nA.\n### 3. Archetype\nB.\n### 4. Rituals\nC.\n",
            &rules(&["Core Essence", "Archetype", "Rituals"]),
        );
        assert_eq!(report.count(FindingKind::NumberingGap), 1);
    }

    #[test]
    fn title_number_checks() {
        let r = rules(&[]);
        assert_eq!(lint("# Number 13\n", &r).count(FindingKind::NumberNotRecognized), 1);
        assert_eq!(lint("# The Seeker\n", &r).count(FindingKind::NumberNotRecognized), 1);
        assert!(lint("# Master Number 33\n", &r).is_clean());
    }

    #[test]
    fn default_rules_cover_standard_outline() {
        let rules = OutlineRules::default();
        assert_eq!(rules.expected_sections.len(), 15);
        assert!(rules.allowed_numbers.contains(&44));
    }
}
