//! Show command implementation.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use numera_common_log::spans::corpus_span;
use numera_content::{Category, ContentLibrary, Corpus};
use serde::Serialize;
use tracing::Instrument;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::icons::IconContext;
use crate::output::{print_output, FormattedOutput};

/// Show accepted entries for a number
#[derive(Debug, Parser)]
pub struct ShowCommand {
    /// Numerology number, e.g. 7 or 22
    pub number: u32,

    /// Only this category, e.g. insight or "physical practice"
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Content directory (default: NUMERA_CONTENT_ROOT, then corpus.root)
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub number: u32,
    pub themes: Vec<String>,
    pub categories: BTreeMap<String, Vec<String>>,
}

impl FormattedOutput for ShowOutput {
    fn format_text(&self) -> String {
        let icons = IconContext::new();
        let mut out = String::new();

        let _ = writeln!(out, "Number {}", self.number);
        if !self.themes.is_empty() {
            let _ = writeln!(out, "Themes: {}", self.themes.join(", "));
        }
        for (category, entries) in &self.categories {
            let _ = writeln!(out, "\n{category} ({})", entries.len());
            for entry in entries {
                let _ = writeln!(out, "  {} {entry}", icons.bullet());
            }
        }
        out
    }
}

impl ShowCommand {
    /// Category key as stored in records. Known categories accept loose
    /// spelling; anything else is used as written.
    fn category_key(&self) -> Option<String> {
        self.category.as_deref().map(|name| match name.parse::<Category>() {
            Ok(category) => category.as_str().to_string(),
            Err(_) => name.trim().to_string(),
        })
    }

    fn collect(&self, library: &ContentLibrary) -> Result<ShowOutput, CliError> {
        if !library.contains(self.number) {
            let available: Vec<String> = library.numbers().map(|n| n.to_string()).collect();
            return Err(CliError::not_found_with_suggestions(
                "content for number",
                self.number.to_string(),
                available,
            ));
        }

        let names: Vec<String> = match self.category_key() {
            Some(key) => {
                let known = library.categories(self.number);
                if !known.contains(&key.as_str()) {
                    return Err(CliError::not_found_with_suggestions(
                        "category",
                        key,
                        known.iter().map(|c| c.to_string()).collect(),
                    ));
                }
                vec![key]
            }
            None => library
                .categories(self.number)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let categories = names
            .into_iter()
            .map(|name| {
                let entries = library.entries(self.number, &name).to_vec();
                (name, entries)
            })
            .collect();

        Ok(ShowOutput {
            number: self.number,
            themes: library.themes(self.number).to_vec(),
            categories,
        })
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        if !ctx.config.schema.allowed_numbers.contains(&self.number) {
            return Err(CliError::user_with_hint(
                format!("{} is not an allowed number", self.number),
                format!("Allowed numbers: {:?}", ctx.config.schema.allowed_numbers),
            ));
        }

        let root = ctx.content_root(self.root.as_deref());
        let span = corpus_span(&root.display().to_string());
        let report = async {
            let corpus = Corpus::discover_with(&root, &ctx.config.corpus).await?;
            Ok::<_, CliError>(corpus.scan(&ctx.schema(), &ctx.outline_rules()).await)
        }
        .instrument(span)
        .await?;

        let library = numera_common_log::timed!(
            "library",
            ContentLibrary::from_records(report.accepted_records())
        );
        tracing::debug!(
            numbers = library.numbers().count(),
            entries = library.total_entries(),
            "library loaded"
        );

        print_output(ctx, &self.collect(&library)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numera_content::NumerologyContentRecord;
    use serde_json::json;

    fn library() -> ContentLibrary {
        let record: NumerologyContentRecord = serde_json::from_value(json!({
            "number": 7,
            "generation_info": {"date": "2025-08-05", "time_context": "universal", "theme": "solitude", "batch_size": 1},
            "insight": ["Silence answers."],
            "physical_practice": ["Walk alone."]
        }))
        .unwrap();
        ContentLibrary::from_records([&record])
    }

    fn show(number: u32, category: Option<&str>) -> ShowCommand {
        ShowCommand {
            number,
            category: category.map(str::to_string),
            root: None,
        }
    }

    #[test]
    fn test_collect_all_categories() {
        let output = show(7, None).collect(&library()).unwrap();
        assert_eq!(output.themes, ["solitude"]);
        assert_eq!(output.categories.len(), 2);
        assert!(output.format_text().contains("Silence answers."));
    }

    #[test]
    fn test_collect_loose_category_name() {
        let output = show(7, Some("Physical Practice")).collect(&library()).unwrap();
        assert_eq!(output.categories.keys().collect::<Vec<_>>(), ["physical_practice"]);
    }

    #[test]
    fn test_missing_number_and_category() {
        let err = show(9, None).collect(&library()).unwrap_err();
        assert_eq!(err.exit_status(), 6);
        assert_eq!(err.suggestions(), ["7"]);

        let err = show(7, Some("shadow")).collect(&library()).unwrap_err();
        assert_eq!(err.exit_status(), 6);
        assert!(err.suggestions().contains(&"insight".to_string()));
    }
}
