//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/cal-exporter/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use cal_feed_rs::Zone;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::cli::ExportFormat;

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CAL_EXPORTER_CONFIG";

/// Minimum token length to apply masking (show first and last N characters).
const TOKEN_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked token.
const TOKEN_MASK_VISIBLE_CHARS: usize = 4;

/// Keys accepted by `config set`.
const VALID_KEYS: &str = "calendar, default_date, timezone, google_token, output.color, output.format";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Calendar used when neither `--calendar` nor `--local` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,

    /// Date range used when `--date` is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_date: Option<String>,

    /// IANA timezone name, or "local".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Google Calendar access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_token: Option<String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            calendar: None,
            default_date: None,
            timezone: None,
            google_token: None,
            output: OutputConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Export format used when `--write` has no recognized extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl OutputConfig {
    /// Parses the configured export format, if any.
    pub fn export_format(&self) -> Result<Option<ExportFormat>> {
        self.format
            .as_deref()
            .map(|name| {
                ExportFormat::from_name(name).ok_or_else(|| {
                    CommandError::Config(format!("Invalid output.format value '{}'", name))
                })
            })
            .transpose()
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/cal-exporter/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("cal-exporter"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("cal-exporter"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the first schema; later migrations go here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.quiet {
        return Ok(());
    }

    use owo_colors::OwoColorize;

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{}\n", header);
    }

    println!("File: {}", path.display());
    println!("Exists: {}\n", path.exists());

    if !path.exists() {
        println!("(No config file exists. Run 'cal-exporter config set <key> <value>' to create one.)");
        return Ok(());
    }

    println!("Settings:");
    if let Some(ref calendar) = config.calendar {
        println!("  calendar: {}", calendar);
    }
    if let Some(ref date) = config.default_date {
        println!("  default_date: {}", date);
    }
    if let Some(ref timezone) = config.timezone {
        println!("  timezone: {}", timezone);
    }
    if let Some(ref token) = config.google_token {
        println!("  google_token: {}", mask_token(token));
    }

    println!("\n[output]");
    if let Some(color) = config.output.color {
        println!("  color: {}", color);
    }
    if let Some(ref format) = config.output.format {
        println!("  format: {}", format);
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if !ctx.quiet {
        let shown = if opts.key == "google_token" {
            mask_token(&opts.value)
        } else {
            opts.value.clone()
        };
        println!("Set {} = {}", opts.key, shown);
    }

    Ok(())
}

/// Validates `value` and stores it under `key`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (None, "calendar") => {
            config.calendar = Some(value.to_string());
        }
        (None, "default_date") => {
            cal_core_rs::filter::parse_date_range(value)?;
            config.default_date = Some(value.to_string());
        }
        (None, "timezone") => {
            value
                .parse::<Zone>()
                .map_err(|e| CommandError::Config(format!("Invalid timezone value: {}", e)))?;
            config.timezone = Some(value.to_string());
        }
        (None, "google_token") => {
            config.google_token = Some(value.to_string());
        }
        (Some("output"), "color") => {
            config.output.color = Some(parse_bool(value)?);
        }
        (Some("output"), "format") => {
            let format = ExportFormat::from_name(value).ok_or_else(|| {
                CommandError::Config(format!(
                    "Invalid output.format value '{}'. Valid values: pdf, xlsx, ods, csv, json",
                    value
                ))
            })?;
            config.output.format = Some(format.extension().to_string());
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key, VALID_KEYS
            )));
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path() -> Result<()> {
    let path = get_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Masks a token for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
fn mask_token(token: &str) -> String {
    let char_count = token.chars().count();
    if char_count > TOKEN_MASK_MIN_LENGTH {
        let prefix: String = token.chars().take(TOKEN_MASK_VISIBLE_CHARS).collect();
        let suffix: String = token
            .chars()
            .skip(char_count - TOKEN_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
