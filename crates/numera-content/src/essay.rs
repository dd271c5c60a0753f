//! Markdown essay parsing.
//!
//! Essays are loosely structured: a `#` or `##` title naming the number,
//! numbered `###` sections, and optional `####` subsections. Nothing here is
//! enforced; see [`crate::outline`] for the checks.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A parsed essay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEssay {
    /// Text of the first `#` or `##` heading.
    pub title: String,
    /// Line of the title heading.
    pub title_line: usize,
    /// First number named in the title, if any.
    pub number: Option<u32>,
    /// Text between the title and the first section.
    pub preamble: String,
    /// `###` sections in document order.
    pub sections: Vec<EssaySection>,
    pub code_blocks: Vec<CodeBlock>,
    /// Non-fatal issues found while parsing.
    pub warnings: Vec<ParseWarning>,
    pub total_lines: usize,
}

impl ParsedEssay {
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Words across all section bodies, excluding code.
    pub fn word_count(&self) -> usize {
        self.sections.iter().map(|s| s.word_count).sum()
    }
}

/// A `###` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssaySection {
    /// Heading text as written.
    pub heading: String,
    /// Heading with any leading `N.` / `N)` removed.
    pub name: String,
    /// The leading number, when the heading has one.
    pub ordinal: Option<u32>,
    pub line: usize,
    /// Section text, subsections included, code excluded.
    pub body: String,
    pub word_count: usize,
    /// `####` headings inside the section.
    pub subsections: Vec<String>,
}

/// Fenced code block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub content: String,
    pub lines: Range<usize>,
    /// Name of the enclosing section.
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub message: String,
    pub line: usize,
    pub severity: WarningSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// Essay parse errors.
#[derive(Debug, thiserror::Error)]
pub enum EssayParseError {
    #[error("Missing essay title: no '#' or '##' heading found")]
    MissingTitle,
}

struct Patterns {
    heading: Regex,
    code_fence: Regex,
    ordinal: Regex,
    title_number: Regex,
    named_number: Regex,
}

/// The number a title names: the one after "Number" when present,
/// otherwise the first standalone 1-2 digit number.
fn title_number(title: &str) -> Option<u32> {
    let p = patterns();
    p.named_number
        .captures(title)
        .or_else(|| p.title_number.captures(title))
        .and_then(|c| c[1].parse().ok())
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        heading: Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").expect("valid heading pattern"),
        code_fence: Regex::new(r"^\s*(```|~~~)\s*([\w+-]*)").expect("valid fence pattern"),
        ordinal: Regex::new(r"^(\d{1,3})\s*[.)]\s*(.+)$").expect("valid ordinal pattern"),
        title_number: Regex::new(r"\b(\d{1,2})\b").expect("valid number pattern"),
        named_number: Regex::new(r"(?i)\bnumber\s+(\d{1,2})\b").expect("valid named number pattern"),
    })
}

#[derive(Default)]
struct ParseState {
    in_code_block: bool,
    fence: String,
    code_block_start: usize,
    code_block_lang: Option<String>,
    code_block_content: String,
}

/// Essay parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct EssayParser;

impl EssayParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an essay, failing when it has no title.
    pub fn parse(&self, content: &str) -> Result<ParsedEssay, EssayParseError> {
        let parsed = self.scan(content);
        if parsed.title.is_empty() {
            return Err(EssayParseError::MissingTitle);
        }
        Ok(parsed)
    }

    /// Parse an essay, recording a missing title as an error-level warning.
    pub fn parse_safe(&self, content: &str) -> ParsedEssay {
        let mut parsed = self.scan(content);
        if parsed.title.is_empty() {
            parsed.warnings.insert(
                0,
                ParseWarning {
                    message: format!("Failed to parse document: {}", EssayParseError::MissingTitle),
                    line: 0,
                    severity: WarningSeverity::Error,
                },
            );
        }
        parsed
    }

    fn scan(&self, content: &str) -> ParsedEssay {
        let p = patterns();
        let mut parsed = ParsedEssay {
            title: String::new(),
            title_line: 0,
            number: None,
            preamble: String::new(),
            sections: Vec::new(),
            code_blocks: Vec::new(),
            warnings: Vec::new(),
            total_lines: content.lines().count(),
        };
        let mut state = ParseState::default();

        for (line_num, line) in content.lines().enumerate() {
            if state.in_code_block {
                if line.trim_start().starts_with(state.fence.as_str()) {
                    parsed.code_blocks.push(CodeBlock {
                        language: state.code_block_lang.take(),
                        content: std::mem::take(&mut state.code_block_content),
                        lines: state.code_block_start..line_num,
                        section: parsed.sections.last().map(|s| s.name.clone()),
                    });
                    state.in_code_block = false;
                } else {
                    state.code_block_content.push_str(line);
                    state.code_block_content.push('\n');
                }
                continue;
            }

            if let Some(caps) = p.code_fence.captures(line) {
                state.in_code_block = true;
                state.fence = caps[1].to_string();
                state.code_block_start = line_num;
                state.code_block_lang = Some(caps[2].to_string()).filter(|s| !s.is_empty());
                continue;
            }

            if let Some(caps) = p.heading.captures(line) {
                let level = caps[1].len();
                let text = caps[2].trim().to_string();

                match level {
                    1 | 2 if parsed.title.is_empty() => {
                        parsed.number = title_number(&text);
                        if parsed.number.is_none() {
                            parsed.warnings.push(ParseWarning {
                                message: format!("Title '{text}' names no number"),
                                line: line_num,
                                severity: WarningSeverity::Warning,
                            });
                        }
                        parsed.title = text;
                        parsed.title_line = line_num;
                    }
                    3 => parsed.sections.push(Self::section(text, line_num)),
                    4 => match parsed.sections.last_mut() {
                        Some(section) => section.subsections.push(text),
                        None => parsed.warnings.push(ParseWarning {
                            message: format!("Subsection '{text}' appears before any section"),
                            line: line_num,
                            severity: WarningSeverity::Info,
                        }),
                    },
                    _ => Self::append(&mut parsed, line),
                }
                continue;
            }

            Self::append(&mut parsed, line);
        }

        if state.in_code_block {
            parsed.warnings.push(ParseWarning {
                message: "Unclosed code block at end of document".to_string(),
                line: state.code_block_start,
                severity: WarningSeverity::Warning,
            });
        }

        parsed.preamble = parsed.preamble.trim().to_string();
        for section in &mut parsed.sections {
            section.body = section.body.trim().to_string();
            section.word_count = section.body.split_whitespace().count();
        }

        parsed
    }

    fn section(heading: String, line: usize) -> EssaySection {
        let (ordinal, name) = match patterns().ordinal.captures(&heading) {
            Some(caps) => (caps[1].parse().ok(), caps[2].trim().to_string()),
            None => (None, heading.clone()),
        };
        EssaySection {
            heading,
            name,
            ordinal,
            line,
            body: String::new(),
            word_count: 0,
            subsections: Vec::new(),
        }
    }

    fn append(parsed: &mut ParsedEssay, line: &str) {
        let target = match parsed.sections.last_mut() {
            Some(section) => &mut section.body,
            None if !parsed.title.is_empty() => &mut parsed.preamble,
            None => return,
        };
        target.push_str(line);
        target.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("# Number 7: The Seeker", Some(7) ; "number first")]
    #[test_case("# The 3 Faces of Number 9", Some(9) ; "named number wins over earlier digits")]
    #[test_case("## Master number 22", Some(22) ; "case insensitive")]
    #[test_case("# 11: The Illuminator", Some(11) ; "bare number fallback")]
    #[test_case("# Seekers and Dreamers", None ; "no number")]
    fn test_title_number(title: &str, expected: Option<u32>) {
        let parsed = EssayParser::new().parse(title).unwrap();
        assert_eq!(parsed.number, expected);
    }

    const SAMPLE_ESSAY: &str = r#"# Number 7: The Seeker

Seven turns inward.

### 1. Core Essence

Seven is the number of the question.

#### Keywords
Analysis, solitude, depth.

### 2) Archetype

The hermit with a lamp.

```text
7 = 1 + 6
```

### Shadow & Light

Isolation on one side, wisdom on the other.
"#;

    #[test]
    fn test_parse_title_and_number() {
        let parsed = EssayParser::new().parse(SAMPLE_ESSAY).unwrap();
        assert_eq!(parsed.title, "Number 7: The Seeker");
        assert_eq!(parsed.number, Some(7));
        assert_eq!(parsed.preamble, "Seven turns inward.");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_sections() {
        let parsed = EssayParser::new().parse(SAMPLE_ESSAY).unwrap();
        let names: Vec<&str> = parsed.section_names().collect();
        assert_eq!(names, ["Core Essence", "Archetype", "Shadow & Light"]);
        assert_eq!(parsed.sections[0].ordinal, Some(1));
        assert_eq!(parsed.sections[1].ordinal, Some(2));
        assert_eq!(parsed.sections[2].ordinal, None);
        assert_eq!(parsed.sections[0].subsections, ["Keywords"]);
        assert!(parsed.sections[0].body.contains("Analysis, solitude"));
    }

    #[test]
    fn test_code_blocks_stay_out_of_bodies() {
        let parsed = EssayParser::new().parse(SAMPLE_ESSAY).unwrap();
        assert_eq!(parsed.code_blocks.len(), 1);
        assert_eq!(parsed.code_blocks[0].language.as_deref(), Some("text"));
        assert_eq!(parsed.code_blocks[0].section.as_deref(), Some("Archetype"));
        assert!(!parsed.sections[1].body.contains("1 + 6"));
        assert_eq!(parsed.sections[1].word_count, 5);
    }

    #[test]
    fn test_level_two_title() {
        let parsed = EssayParser::new()
            .parse("## The Master Number 22\n\n### 1. Core Essence\nBuilder.\n")
            .unwrap();
        assert_eq!(parsed.number, Some(22));
        assert_eq!(parsed.sections.len(), 1);
    }

    #[test]
    fn test_missing_title() {
        let content = "### 1. Core Essence\nNo title here.\n";
        assert!(matches!(
            EssayParser::new().parse(content),
            Err(EssayParseError::MissingTitle)
        ));

        let parsed = EssayParser::new().parse_safe(content);
        assert!(parsed.title.is_empty());
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.warnings[0].severity, WarningSeverity::Error);
    }

    #[test]
    fn test_unclosed_code_block() {
        let parsed = EssayParser::new()
            .parse("# Number 3\n\n### 1. Rituals\n```\nlight a candle\n")
            .unwrap();
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].message.contains("Unclosed code block"));
    }

    #[test]
    fn test_title_without_number() {
        let parsed = EssayParser::new().parse("# The Seeker\n").unwrap();
        assert_eq!(parsed.number, None);
        assert_eq!(parsed.warnings[0].severity, WarningSeverity::Warning);
    }
}
