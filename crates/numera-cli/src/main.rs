//! Numera CLI
//!
//! Main entry point for the `numera` binary.

use std::process::ExitCode;

use clap::Parser;

use numera_cli::cli::{Cli, OutputFormat};
use numera_cli::error::ErrorFormatter;
use numera_cli::output::color::ColorMode;
use numera_cli::CliError;
use numera_common_config::Environment;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = cli.format;
    let formatter = ErrorFormatter::new()
        .color_mode(ColorMode::from(cli.color))
        .verbose(cli.verbose > 0);

    if let Err(e) = Environment::init() {
        formatter.print(&CliError::config(format!("Failed to load .env file: {e}")));
        return Exit::GeneralError.into();
    }

    init_tracing(&cli);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            formatter.print(&CliError::io("Failed to create Tokio runtime", e));
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            tracing::debug!(code = e.code(), "command failed");
            match format {
                OutputFormat::Text => formatter.print(&e),
                OutputFormat::Json => eprintln!("{}", formatter.format_json(&e)),
            }
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    cli.execute(config).await
}

fn init_tracing(cli: &Cli) {
    if let Err(e) = numera_common_log::init(cli.log_config()) {
        eprintln!("warning: logging disabled: {e}");
    }
}
