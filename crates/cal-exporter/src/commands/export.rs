//! Export command implementation.
//!
//! Resolves the event source, date range and outputs from flags and config,
//! fetches the events, applies the hashtag filter and writes the results.

use std::fs;
use std::path::{Path, PathBuf};

use cal_core_rs::filter::filter_events;
use cal_feed_rs::{is_ics_url, source_for, CalendarSource, EventSource, Zone};
use tracing::{debug, info, warn};

use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::cli::{Cli, ExportFormat};
use crate::output::{file_exporter, Exporter, TerminalExporter};

/// Date range used when neither `--date` nor `default_date` is set.
const DEFAULT_DATE: &str = "today";

const BOTH_SOURCES: &str = "Cannot use both -c/--calendar and -l/--local. Choose one.";
const NO_SOURCE: &str = "You must specify either -c/--calendar or -l/--local";
const NO_FORMAT: &str = "When using -w/--write, you must specify -e/--export format or use a recognized file extension (.pdf, .xlsx, .ods, .csv, .json)";

/// Options for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub calendar: Option<String>,
    pub local: Option<PathBuf>,
    pub search: Vec<String>,
    pub date: Option<String>,
    pub write: Option<PathBuf>,
    pub export: Option<ExportFormat>,
    pub terminal: bool,
    pub credentials: Option<PathBuf>,
    pub google_token: Option<String>,
    pub timezone: Option<String>,
}

impl ExportOptions {
    /// Collects the export flags from the parsed CLI.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            calendar: cli.calendar.clone(),
            local: cli.local.clone(),
            search: cli.search.clone(),
            date: cli.date.clone(),
            write: cli.write.clone(),
            export: cli.export,
            terminal: cli.terminal,
            credentials: cli.credentials.clone(),
            google_token: cli.google_token.clone(),
            timezone: cli.timezone.clone(),
        }
    }
}

/// Where events are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Calendar(String),
    Local(PathBuf),
}

/// Where events are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub file: Option<(PathBuf, ExportFormat)>,
    pub terminal: bool,
}

/// Picks the input. Flags win over the configured calendar.
pub fn resolve_input(opts: &ExportOptions, config: &Config) -> Result<Input> {
    match (&opts.calendar, &opts.local) {
        (Some(_), Some(_)) => Err(CommandError::Usage(BOTH_SOURCES.to_string())),
        (Some(calendar), None) => Ok(Input::Calendar(calendar.clone())),
        (None, Some(path)) => Ok(Input::Local(path.clone())),
        (None, None) => config
            .calendar
            .clone()
            .map(Input::Calendar)
            .ok_or_else(|| CommandError::Usage(NO_SOURCE.to_string())),
    }
}

/// Decides the output file format and whether to print a table.
///
/// The format comes from `--export`, then the `--write` extension, then
/// `output.format` in the config. The table is printed when `--terminal` is
/// given or nothing is written.
pub fn resolve_output(opts: &ExportOptions, config: &Config) -> Result<OutputPlan> {
    let Some(path) = &opts.write else {
        if let Some(format) = opts.export {
            warn!("--export {} has no effect without --write", format.extension());
        }
        return Ok(OutputPlan {
            file: None,
            terminal: true,
        });
    };

    let format = match opts.export.or_else(|| ExportFormat::from_path(path)) {
        Some(format) => format,
        None => config
            .output
            .export_format()?
            .ok_or_else(|| CommandError::Usage(NO_FORMAT.to_string()))?,
    };

    Ok(OutputPlan {
        file: Some((path.clone(), format)),
        terminal: opts.terminal,
    })
}

/// Timezone from `--timezone`, then config, then the system zone.
pub fn resolve_zone(opts: &ExportOptions, config: &Config) -> Result<Zone> {
    if let Some(name) = &opts.timezone {
        return name.parse().map_err(CommandError::Usage);
    }
    match &config.timezone {
        Some(name) => name.parse().map_err(CommandError::Config),
        None => Ok(Zone::Local),
    }
}

/// Google access token: flag or env first, then the credentials file, then
/// the config.
pub fn resolve_token(opts: &ExportOptions, config: &Config) -> Result<Option<String>> {
    if let Some(token) = opts.google_token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(Some(token.to_string()));
    }
    if let Some(path) = &opts.credentials {
        return read_credentials(path).map(Some);
    }
    Ok(config.google_token.clone())
}

/// Reads an access token from a JSON credentials file holding
/// `access_token` or `token`.
fn read_credentials(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        CommandError::Config(format!(
            "Failed to read credentials file {}: {}",
            path.display(),
            e
        ))
    })?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        CommandError::Config(format!(
            "Failed to parse credentials file {}: {}",
            path.display(),
            e
        ))
    })?;

    ["access_token", "token"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::Config(format!(
                "Credentials file {} has no \"access_token\" or \"token\" field",
                path.display()
            ))
        })
}

/// Executes the export command.
pub async fn execute(ctx: &CommandContext, opts: &ExportOptions, config: &Config) -> Result<()> {
    let input = resolve_input(opts, config)?;
    let plan = resolve_output(opts, config)?;
    let zone = resolve_zone(opts, config)?;

    let date = opts
        .date
        .as_deref()
        .or(config.default_date.as_deref())
        .unwrap_or(DEFAULT_DATE);
    let range = zone.parse_date_range(date)?;
    info!("Filtering events from {range}");
    debug!(%zone, date, "resolved date range");

    let source = match &input {
        Input::Local(path) => {
            let source = CalendarSource::local(path, zone)?;
            info!("Loading events from local file: {}", path.display());
            source
        }
        Input::Calendar(calendar) => {
            let token = if is_ics_url(calendar) {
                None
            } else {
                resolve_token(opts, config)?
            };
            let source = source_for(calendar, token.as_deref(), zone)?;
            info!("Fetching events from calendar...");
            source
        }
    };
    debug!(kind = source.kind(), "selected event source");

    let mut events = source.fetch(&range).await?;
    info!("Found {} events in date range.", events.len());

    if !opts.search.is_empty() {
        events = filter_events(&events, &opts.search);
        info!("After hashtag filter: {} events.", events.len());
    }

    if events.is_empty() {
        info!("No events found matching your criteria.");
        return Ok(());
    }

    if let Some((path, format)) = &plan.file {
        file_exporter(*format, path.clone()).export(&events)?;
        info!("Exported to {}", path.display());
    }

    if plan.terminal && !ctx.quiet {
        TerminalExporter::new(ctx.use_colors).export(&events)?;
    }

    Ok(())
}
