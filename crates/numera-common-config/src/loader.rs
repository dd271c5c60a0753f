//! Configuration file loading and parsing.

use crate::types::NumeraConfig;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".numera";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Where the loader looks for its file.
#[derive(Debug, Clone)]
enum Source {
    /// `<project>/.numera/config.yaml`, defaults when absent.
    Project(PathBuf),
    /// An explicit file that must exist.
    File(PathBuf),
}

/// Configuration loader.
pub struct ConfigLoader {
    source: Source,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
    })
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            source: Source::Project(project_dir.as_ref().to_path_buf()),
        }
    }

    /// Create a loader for an explicit config file.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
        }
    }

    /// Path of the file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        match &self.source {
            Source::Project(dir) => dir.join(CONFIG_DIR).join(CONFIG_FILE),
            Source::File(path) => path.clone(),
        }
    }

    /// Load configuration.
    ///
    /// A project loader falls back to defaults when no file exists; a file
    /// loader reports [`ConfigError::NotFound`].
    pub fn load(&self) -> Result<NumeraConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return match self.source {
                Source::Project(_) => Ok(NumeraConfig::default()),
                Source::File(_) => Err(ConfigError::NotFound { path: config_path }),
            };
        }

        let contents = std::fs::read_to_string(&config_path)?;
        self.load_str(&contents)
    }

    /// Parse, expand, and validate configuration text.
    pub fn load_str(&self, contents: &str) -> Result<NumeraConfig, ConfigError> {
        let expanded = self.expand_env_vars(contents)?;

        // An empty or comment-only file means "all defaults".
        if expanded.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Ok(NumeraConfig::default());
        }

        let config: NumeraConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in env_var_pattern().captures_iter(content) {
            let full_match = &cap[0];
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(full_match, &value);
        }

        Ok(result)
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &NumeraConfig) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            message: message.to_string(),
        };

        let schema = &config.schema;
        if schema.allowed_numbers.is_empty() {
            return Err(invalid("schema.allowed_numbers must not be empty"));
        }
        if let Some(n) = schema.allowed_numbers.iter().find(|n| !(1..=99).contains(*n)) {
            return Err(ConfigError::ValidationError {
                message: format!("schema.allowed_numbers contains {n}, expected 1-99"),
            });
        }

        if schema.categories.is_empty() {
            return Err(invalid("schema.categories must not be empty"));
        }
        let mut seen = HashSet::new();
        for category in &schema.categories {
            if category.trim().is_empty() {
                return Err(invalid("schema.categories contains an empty name"));
            }
            if !seen.insert(category.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("schema.categories lists '{category}' twice"),
                });
            }
        }

        let corpus = &config.corpus;
        if corpus.record_extension.is_empty() || corpus.essay_extension.is_empty() {
            return Err(invalid("corpus extensions must not be empty"));
        }
        if corpus.record_extension.eq_ignore_ascii_case(&corpus.essay_extension) {
            return Err(invalid(
                "corpus.record_extension and corpus.essay_extension must differ",
            ));
        }

        if config.essays.expected_sections.is_empty() {
            return Err(invalid("essays.expected_sections must not be empty"));
        }

        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, config: &NumeraConfig) -> Result<(), ConfigError> {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}
