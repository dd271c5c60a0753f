//! Config command implementation.

use clap::Parser;
use numera_common_config::{ConfigLoader, NumeraConfig};
use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Print the effective configuration
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    /// Print only the configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct EffectiveConfig<'a>(&'a NumeraConfig);

impl FormattedOutput for EffectiveConfig<'_> {
    fn format_text(&self) -> String {
        serde_yaml::to_string(self.0).unwrap_or_else(|e| format!("# failed to render configuration: {e}"))
    }
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        if self.path {
            let loader = match &ctx.config_path {
                Some(path) => ConfigLoader::from_file(path),
                None => ConfigLoader::new("."),
            };
            let path = loader.config_path();
            match ctx.format {
                OutputFormat::Text => println!("{}", path.display()),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "path": path, "exists": path.exists() })
                ),
            }
            return Ok(());
        }

        print_output(ctx, &EffectiveConfig(&ctx.config))
    }
}
