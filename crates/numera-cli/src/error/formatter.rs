//! Error formatting for CLI output.

use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};

use crate::error::CliError;
use crate::output::color::{Color, ColorMode, Styled};

/// Error output formatter
pub struct ErrorFormatter {
    color_mode: ColorMode,
    verbose: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self {
            color_mode: if io::stderr().is_terminal() {
                ColorMode::Auto
            } else {
                ColorMode::Never
            },
            verbose: false,
        }
    }

    /// Set the color mode. `Auto` still stays plain when stderr is not a terminal.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = match mode {
            ColorMode::Auto if !io::stderr().is_terminal() => ColorMode::Never,
            other => other,
        };
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Format and print an error
    pub fn print(&self, error: &CliError) {
        let formatted = self.format(error);
        eprint!("{formatted}");
    }

    fn label(&self, text: &str, color: Color) -> Styled {
        Styled::new(text).with_color_mode(self.color_mode).fg(color)
    }

    /// Format an error to a string
    pub fn format(&self, error: &CliError) -> String {
        let mut output = String::new();

        let error_prefix = self.label(&format!("error[{}]:", error.code()), Color::Red).bold();
        let _ = writeln!(output, "{error_prefix} {error}");

        if self.verbose {
            self.format_source_chain(&mut output, error);
        }

        self.format_context(&mut output, error);

        if let Some(hint) = error.hint() {
            let hint_label = self.label("hint:", Color::Cyan).bold();
            let _ = writeln!(output, "\n{hint_label} {hint}");
        }

        let suggestions = error.suggestions();
        if !suggestions.is_empty() {
            let suggest_label = self.label("suggestions:", Color::Yellow).bold();
            let _ = writeln!(output, "\n{suggest_label}");

            for suggestion in suggestions {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(&self, error: &CliError) -> String {
        let json = serde_json::json!({
            "error": {
                "code": error.code(),
                "exit_code": error.exit_status(),
                "message": error.to_string(),
                "hint": error.hint(),
                "suggestions": error.suggestions(),
            }
        });

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| error.to_string())
    }

    fn format_source_chain(&self, output: &mut String, error: &CliError) {
        use std::error::Error;

        let source_opt: Option<&dyn Error> = match error {
            CliError::Config { source, .. } => source.as_ref().map(|e| e.as_ref() as &dyn Error),
            CliError::Io { source, .. } => Some(source as &dyn Error),
            CliError::Other(e) => e.source(),
            _ => None,
        };

        if let Some(source) = source_opt {
            let caused_label = self.label("caused by:", Color::BrightBlack);
            let _ = writeln!(output, "\n{caused_label}");
            let _ = writeln!(output, "  {source}");

            let mut current = source.source();
            let mut depth = 1;
            while let Some(src) = current {
                let _ = writeln!(output, "  {depth}: {src}");
                current = src.source();
                depth += 1;
            }
        }
    }

    fn format_context(&self, output: &mut String, error: &CliError) {
        match error {
            CliError::Io { path: Some(p), .. } => {
                let path_label = self.label("path:", Color::BrightBlack);
                let _ = writeln!(output, "\n  {path_label} {}", p.display());
            }
            CliError::NotFound {
                resource_type,
                resource_name,
                ..
            } => {
                let resource_label = self.label("resource:", Color::BrightBlack);
                let _ = writeln!(output, "\n  {resource_label} {resource_type}/{resource_name}");
            }
            CliError::Validation { failed, total, .. } => {
                let passed_label = self.label("passed:", Color::BrightBlack);
                let _ = writeln!(output, "\n  {passed_label} {}/{total}", total.saturating_sub(*failed));
            }
            _ => {}
        }
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatter() {
        let error = CliError::config("Test error");
        let formatter = ErrorFormatter::new().color_mode(ColorMode::Never);
        let output = formatter.format(&error);

        assert!(output.contains("error[E001]:"));
        assert!(output.contains("Test error"));
    }

    #[test]
    fn test_error_json_format() {
        let error = CliError::config("Test error");
        let json: serde_json::Value = serde_json::from_str(&ErrorFormatter::new().format_json(&error)).unwrap();

        assert_eq!(json["error"]["code"], "E001");
        assert_eq!(json["error"]["exit_code"], 2);
        assert_eq!(json["error"]["message"], "Test error");
    }

    #[test]
    fn test_error_with_hint() {
        let error = CliError::user_with_hint("13 is not an allowed number", "Allowed numbers: [1, 2, 3]");
        let output = ErrorFormatter::new().color_mode(ColorMode::Never).format(&error);

        assert!(output.contains("error[E010]: 13 is not an allowed number"));
        assert!(output.contains("hint: Allowed numbers: [1, 2, 3]"));
    }

    #[test]
    fn test_error_with_suggestions() {
        let error = CliError::not_found_with_suggestions("category", "insigth", vec!["insight".to_string()]);
        let output = ErrorFormatter::new().color_mode(ColorMode::Never).format(&error);

        assert!(output.contains("suggestions:"));
        assert!(output.contains("- insight"));
        assert!(output.contains("resource: category/insigth"));
    }

    #[test]
    fn test_validation_context() {
        let error = CliError::validation(2, 5, "record file(s)");
        let output = ErrorFormatter::new().color_mode(ColorMode::Never).format(&error);

        assert!(output.contains("error[E004]: 2 of 5 record file(s) failed validation"));
        assert!(output.contains("passed: 3/5"));
    }

    #[test]
    fn test_verbose_mode() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = CliError::io_with_path("Failed to read file", io_error, "six.json");
        let output = ErrorFormatter::new()
            .color_mode(ColorMode::Never)
            .verbose(true)
            .format(&error);

        assert!(output.contains("caused by:"));
        assert!(output.contains("path: six.json"));
    }
}
