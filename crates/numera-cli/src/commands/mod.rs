//! Command implementations.

mod check;
mod config;
mod lint;
mod show;
mod validate;

pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use lint::LintCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;

use std::path::Path;

use crate::error::CliError;

/// Read a UTF-8 file, tagging failures with the path.
pub(crate) async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::io_with_path(format!("Failed to read {}", path.display()), e, path))
}
