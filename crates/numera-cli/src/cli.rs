//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, ColorChoice, Parser, Subcommand, ValueHint};
use numera_common_config::{ConfigLoader, Environment, NumeraConfig};
use numera_common_log::{vars, LogConfig, LogLevel};
use numera_content::{OutlineRules, RecordSchema};

use crate::commands::{CheckCommand, ConfigCommand, LintCommand, ShowCommand, ValidateCommand};
use crate::error::CliError;

/// Numera - numerology content checks
///
/// Validate content records, lint essay outlines and scan content directories.
#[derive(Debug, Parser)]
#[command(
    name = "numera",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "NUMERA_CONFIG",
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "When to use terminal colors"
    )]
    pub color: ColorChoice,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate content record files
    Validate(ValidateCommand),

    /// Lint essay outlines
    Lint(LintCommand),

    /// Scan a content directory
    #[command(visible_alias = "scan")]
    Check(CheckCommand),

    /// Show accepted entries for a number
    Show(ShowCommand),

    /// Print the effective configuration
    Config(ConfigCommand),

    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsCommand),
}

/// Shell completions generation
#[derive(Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Cli {
    /// Load configuration from `--config` or the current directory.
    ///
    /// An explicit file must exist; `.numera/config.yaml` in the current
    /// directory is optional.
    pub fn load_config(&self) -> Result<NumeraConfig, CliError> {
        let loader = match &self.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new("."),
        };

        tracing::debug!(path = %loader.config_path().display(), "loading configuration");
        loader.load().map_err(CliError::from)
    }

    /// Logging setup from the environment and the verbosity flags.
    ///
    /// `-v`/`-q` force the level over both `NUMERA_LOG_LEVEL` and `RUST_LOG`.
    /// Without them the level falls back to warn, but `RUST_LOG` directives
    /// still apply.
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::from_env();
        if self.verbose > 0 || self.quiet {
            return config.with_level(LogLevel::from_verbosity(self.verbose, self.quiet));
        }
        if std::env::var(vars::NUMERA_LOG_LEVEL).is_err() {
            return LogConfig {
                level: LogLevel::from_verbosity(0, false),
                ..config
            };
        }
        config
    }

    /// Execute the selected command
    pub async fn execute(self, config: NumeraConfig) -> Result<(), CliError> {
        let ctx = CommandContext {
            config,
            config_path: self.config.clone(),
            format: self.format,
            color: self.color,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match self.command {
            Command::Validate(cmd) => cmd.execute(&ctx).await,
            Command::Lint(cmd) => cmd.execute(&ctx).await,
            Command::Check(cmd) => cmd.execute(&ctx).await,
            Command::Show(cmd) => cmd.execute(&ctx).await,
            Command::Config(cmd) => cmd.execute(&ctx),
            Command::Completions(cmd) => cmd.execute(&ctx),
        }
    }
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: NumeraConfig,
    /// The `--config` file, when one was given.
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub color: ColorChoice,
    pub verbose: u8,
    pub quiet: bool,
}

impl CommandContext {
    /// Context with default configuration, for tests and embedding.
    pub fn new(config: NumeraConfig, format: OutputFormat) -> Self {
        Self {
            config,
            config_path: None,
            format,
            color: ColorChoice::Never,
            verbose: 0,
            quiet: false,
        }
    }

    pub fn schema(&self) -> RecordSchema {
        RecordSchema::from(&self.config.schema)
    }

    pub fn outline_rules(&self) -> OutlineRules {
        OutlineRules::from_config(&self.config)
    }

    /// Content root: the argument, then `NUMERA_CONTENT_ROOT`, then
    /// `corpus.root` from configuration.
    pub fn content_root(&self, arg: Option<&Path>) -> PathBuf {
        arg.map(Path::to_path_buf)
            .or_else(Environment::content_root)
            .unwrap_or_else(|| self.config.corpus.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_with_globals() {
        let cli = Cli::try_parse_from(["numera", "-vv", "--format", "json", "validate", "a.json", "b.json", "--strict"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Validate(cmd) => {
                assert_eq!(cmd.files.len(), 2);
                assert!(cmd.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbosity_flags_force_log_level() {
        let cli = Cli::try_parse_from(["numera", "-vv", "check"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.env_directives);

        let cli = Cli::try_parse_from(["numera", "-q", "check"]).unwrap();
        assert_eq!(cli.log_config().level, LogLevel::Error);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["numera", "-q", "-v", "config"]).is_err());
    }

    #[test]
    fn test_content_root_prefers_argument() {
        let ctx = CommandContext::new(NumeraConfig::default(), OutputFormat::Text);
        assert_eq!(ctx.content_root(Some(Path::new("elsewhere"))), PathBuf::from("elsewhere"));
    }
}
