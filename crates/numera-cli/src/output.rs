//! Output formatting utilities for CLI commands.

use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

pub mod color;
pub mod icons;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error>
    where
        Self: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

/// Render `value` in the context's format.
pub fn render<T>(ctx: &CommandContext, value: &T) -> Result<String, CliError>
where
    T: FormattedOutput + Serialize,
{
    match ctx.format {
        OutputFormat::Text => Ok(value.format_text()),
        OutputFormat::Json => Ok(value.format_json()?),
    }
}

/// Print formatted output to stdout.
///
/// Text output is suppressed by `--quiet`; JSON is always printed.
pub fn print_output<T>(ctx: &CommandContext, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    if ctx.quiet && ctx.format == OutputFormat::Text {
        return Ok(());
    }

    let output = render(ctx, value)?;
    println!("{}", output.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numera_common_config::NumeraConfig;

    #[derive(Serialize)]
    struct Greeting {
        message: String,
    }

    impl FormattedOutput for Greeting {
        fn format_text(&self) -> String {
            self.message.clone()
        }
    }

    #[test]
    fn test_render_formats() {
        let value = Greeting {
            message: "hello".to_string(),
        };

        let text = CommandContext::new(NumeraConfig::default(), OutputFormat::Text);
        assert_eq!(render(&text, &value).unwrap(), "hello");

        let json = CommandContext::new(NumeraConfig::default(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&render(&json, &value).unwrap()).unwrap();
        assert_eq!(parsed["message"], "hello");
    }
}
