use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, ConfigSetOptions};
use commands::export::ExportOptions;
use commands::{CommandContext, CommandError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            error_exit_code(&e)
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell)?;
            Ok(())
        }
        Some(Commands::Config { command }) => {
            // A broken config file must not block `config path` or `config set`.
            let ctx = CommandContext::from_cli(cli, &load_config().unwrap_or_default());
            match command {
                None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx),
                Some(ConfigCommands::Set { key, value }) => commands::config::execute_set(
                    &ctx,
                    &ConfigSetOptions {
                        key: key.clone(),
                        value: value.clone(),
                    },
                ),
                Some(ConfigCommands::Path) => commands::config::execute_path(),
            }
        }
        None => {
            let config = load_config()?;
            let ctx = CommandContext::from_cli(cli, &config);
            let opts = ExportOptions::from_cli(cli);
            commands::export::execute(&ctx, &opts, &config).await
        }
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

/// Numeric exit status: 1 usage, 2 fetch, 3 I/O, 5 config.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Usage(_) => 1,
        CommandError::DateRange(_) => 1,
        CommandError::Feed(err) => err.exit_code(),
        CommandError::Config(_) => 5,
        CommandError::Export(_) => 3,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}
