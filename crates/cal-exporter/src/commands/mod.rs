//! Command implementations for the cal-exporter CLI.

pub mod completions;
pub mod config;
pub mod export;

use std::env;

use cal_core_rs::DateRangeError;
use cal_feed_rs::FeedError;

use crate::cli::Cli;
use crate::output::ExportError;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Invalid combination of flags.
    #[error("{0}")]
    Usage(String),

    /// The `--date` value could not be parsed.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Fetching events failed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing an export file failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common settings.
pub struct CommandContext {
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Colors are off when `--no-color` is given, `NO_COLOR` is set, or the
    /// config sets `output.color = false`.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_context_colors() {
        let original = env::var_os("NO_COLOR");
        env::remove_var("NO_COLOR");

        let config = Config::default();
        let cli = Cli::parse_from(["cal-exporter", "-l", "cal.ics"]);
        let with_colors = CommandContext::from_cli(&cli, &config).use_colors;

        let cli = Cli::parse_from(["cal-exporter", "--no-color", "-l", "cal.ics"]);
        let flag_disabled = CommandContext::from_cli(&cli, &config).use_colors;

        let mut config_off = Config::default();
        config_off.output.color = Some(false);
        let cli = Cli::parse_from(["cal-exporter", "-l", "cal.ics"]);
        let config_disabled = CommandContext::from_cli(&cli, &config_off).use_colors;

        env::set_var("NO_COLOR", "1");
        let env_disabled = CommandContext::from_cli(&cli, &config).use_colors;

        match original {
            Some(val) => env::set_var("NO_COLOR", val),
            None => env::remove_var("NO_COLOR"),
        }

        assert!(with_colors);
        assert!(!flag_disabled);
        assert!(!config_disabled);
        assert!(!env_disabled);
    }

    #[test]
    fn test_usage_error_message_is_verbatim() {
        let err = CommandError::Usage("Cannot use both -c/--calendar and -l/--local.".to_string());
        assert_eq!(err.to_string(), "Cannot use both -c/--calendar and -l/--local.");
    }

    #[test]
    fn test_date_range_error_is_transparent() {
        let err: CommandError = DateRangeError::invalid_date_format("2026-13-45").into();
        assert!(err.to_string().starts_with("Invalid date format: 2026-13-45"));
    }
}
