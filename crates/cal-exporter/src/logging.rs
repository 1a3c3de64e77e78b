//! Log setup. Progress messages and diagnostics go to stderr so stdout stays
//! free for the terminal table and completions.

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Default filter directive for the given verbosity flags.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the flags.
pub fn init(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(cli.verbose, cli.quiet)));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .without_time()
        .with_target(false)
        .with_level(cli.verbose)
        .try_init();
}
