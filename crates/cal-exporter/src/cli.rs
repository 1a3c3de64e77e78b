//! CLI argument parsing using clap derive macros.
//!
//! Running `cal-exporter` without a subcommand exports events; `config` and
//! `completions` are housekeeping subcommands.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// cal-exporter - Export calendar events filtered by date range and hashtags
#[derive(Parser, Debug)]
#[command(name = "cal-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// IANA timezone for dates without an offset (default: system local)
    #[arg(long, global = true, value_name = "TZ")]
    pub timezone: Option<String>,

    /// Google Calendar ID or public iCal feed URL
    #[arg(short, long, value_name = "ID_OR_URL")]
    pub calendar: Option<String>,

    /// Local .ics file to read instead of a calendar
    #[arg(short, long, value_name = "FILE")]
    pub local: Option<PathBuf>,

    /// Hashtag filter; commas mean AND, repeated flags mean OR
    #[arg(short, long, action = ArgAction::Append, value_name = "TAGS")]
    pub search: Vec<String>,

    /// Date or range: "today", YYYY-MM-DD, YYYY-MM-DDTHH:MM, or START:END
    #[arg(short, long, value_name = "RANGE")]
    pub date: Option<String>,

    /// Write the export to this file
    #[arg(short, long, value_name = "FILE")]
    pub write: Option<PathBuf>,

    /// Export format (inferred from the --write extension when omitted)
    #[arg(short, long, value_enum, ignore_case = true)]
    pub export: Option<ExportFormat>,

    /// Also print the events to the terminal when writing a file
    #[arg(short, long)]
    pub terminal: bool,

    /// JSON file holding a Google access token ("access_token" or "token")
    #[arg(short = 'g', long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Google Calendar access token
    #[arg(long, env = "CAL_EXPORTER_GOOGLE_TOKEN", hide_env_values = true)]
    pub google_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "timezone", "output.format")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

/// File formats accepted by `--export`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Ods,
    Csv,
    Json,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["cal-exporter", "--verbose", "-l", "cal.ics"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["cal-exporter", "-q", "--no-color", "-l", "cal.ics"]);
        assert!(cli.quiet);
        assert!(cli.no_color);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["cal-exporter", "-q", "-v", "-l", "cal.ics"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_flags() {
        let cli = Cli::parse_from([
            "cal-exporter",
            "-c",
            "primary",
            "-d",
            "2026-02-01:2026-02-28",
            "-w",
            "out/report.pdf",
            "-e",
            "pdf",
            "-t",
        ]);
        assert_eq!(cli.calendar.as_deref(), Some("primary"));
        assert_eq!(cli.date.as_deref(), Some("2026-02-01:2026-02-28"));
        assert_eq!(cli.write, Some(PathBuf::from("out/report.pdf")));
        assert_eq!(cli.export, Some(ExportFormat::Pdf));
        assert!(cli.terminal);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_search_is_repeatable() {
        let cli = Cli::parse_from([
            "cal-exporter",
            "-l",
            "cal.ics",
            "-s",
            "#billable,#client",
            "--search",
            "zzp",
        ]);
        assert_eq!(cli.search, vec!["#billable,#client", "zzp"]);
    }

    #[test]
    fn test_export_format_ignores_case() {
        let cli = Cli::parse_from(["cal-exporter", "-l", "cal.ics", "-e", "XLSX"]);
        assert_eq!(cli.export, Some(ExportFormat::Xlsx));

        let cli = Cli::parse_from(["cal-exporter", "-l", "cal.ics", "--export", "Csv"]);
        assert_eq!(cli.export, Some(ExportFormat::Csv));
    }

    #[test]
    fn test_unknown_export_format_rejected() {
        let result = Cli::try_parse_from(["cal-exporter", "-l", "cal.ics", "-e", "docx"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_and_timezone() {
        let cli = Cli::parse_from([
            "cal-exporter",
            "-c",
            "primary",
            "-g",
            "creds.json",
            "--timezone",
            "Europe/Amsterdam",
        ]);
        assert_eq!(cli.credentials, Some(PathBuf::from("creds.json")));
        assert_eq!(cli.timezone.as_deref(), Some("Europe/Amsterdam"));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["cal-exporter", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config { command: None })));

        let cli = Cli::parse_from(["cal-exporter", "config", "set", "timezone", "UTC"]);
        match cli.command {
            Some(Commands::Config {
                command: Some(ConfigCommands::Set { key, value }),
            }) => {
                assert_eq!(key, "timezone");
                assert_eq!(value, "UTC");
            }
            other => panic!("Expected config set, got {:?}", other),
        }

        let cli = Cli::parse_from(["cal-exporter", "config", "path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Path)
            })
        ));
    }

    #[test]
    fn test_completions_command() {
        let cli = Cli::parse_from(["cal-exporter", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));
    }
}
