//! Environment variable handling.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    /// Overrides `corpus.root`.
    pub const NUMERA_CONTENT_ROOT: &str = "NUMERA_CONTENT_ROOT";
    /// Selects an extra `.env.<name>` file.
    pub const NUMERA_ENV: &str = "NUMERA_ENV";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from .env files.
    ///
    /// Missing files are fine; a file that exists but cannot be parsed is an
    /// error.
    pub fn init() -> Result<Self, EnvError> {
        load_optional(".env")?;
        load_optional(".env.local")?;

        if let Ok(name) = env::var(vars::NUMERA_ENV) {
            load_optional(&format!(".env.{name}"))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Content root override from `NUMERA_CONTENT_ROOT`.
    pub fn content_root() -> Option<PathBuf> {
        Self::get(vars::NUMERA_CONTENT_ROOT)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    }
}

fn load_optional(filename: &str) -> Result<(), EnvError> {
    match dotenvy::from_filename(filename) {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
