use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use resultsink_config::ClientSettings;
use std::path::PathBuf;

mod commands;

/// Report test results to a local ResultSink.
///
/// The sink address and auth token are read from the LUCI context file named
/// by the LUCI_CONTEXT environment variable. Without one, reports are
/// silently skipped.
///
/// EXAMPLES:
///     resultsink post Suite/testFoo PASS                  Report a pass
///     resultsink post Suite/testBar FAIL --log-file out   Attach a log
///     resultsink compose Suite/testFoo SKIP --tag disabled_test=true
///     resultsink context                                  Show the sink
///
/// ENVIRONMENT VARIABLES:
///     LUCI_CONTEXT             Path to the LUCI context file
///     RESULTSINK_CONTEXT_VAR   Read the context path from another variable
///     RESULTSINK_TIMEOUT_SECS  Request timeout in seconds
///     RUST_LOG                 Log filter (e.g. debug)
#[derive(Parser)]
#[command(name = "resultsink")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Client settings file (TOML)
    #[arg(long, short = 's', global = true, env = "RESULTSINK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report one test result to the sink
    ///
    /// Exits successfully without sending anything when no sink is
    /// configured.
    ///
    /// EXAMPLES:
    ///     resultsink post Suite/testFoo PASS
    ///     resultsink post Suite/testFoo CRASH --unexpected --log-file crash.log
    #[command(visible_alias = "p")]
    Post(ResultArgs),

    /// Print the result record as JSON without sending it
    ///
    /// EXAMPLES:
    ///     resultsink compose Suite/testFoo SKIP --tag disabled_test=true
    ///     resultsink compose Suite/testFoo PASS --tags-json '[["k","v"]]'
    Compose(ResultArgs),

    /// Show the resolved sink endpoint
    ///
    /// The auth token is never printed.
    Context,
}

/// Arguments describing one test result
#[derive(Args, Debug)]
pub struct ResultArgs {
    /// Test identifier (e.g. Suite/testName)
    pub test_id: String,

    /// Test status: PASS, FAIL, CRASH, ABORT or SKIP
    pub status: String,

    /// Mark the status as unexpected
    #[arg(long)]
    pub unexpected: bool,

    /// Attach this file as the test log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tag in key=value form (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Tags as a JSON list of [key, value] pairs
    #[arg(long)]
    pub tags_json: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = ClientSettings::load(cli.settings.as_deref())
        .context("Failed to load ResultSink settings")?;

    match cli.command {
        Commands::Post(args) => commands::post::run(&args, &settings),
        Commands::Compose(args) => commands::compose::run(&args),
        Commands::Context => commands::context::run(&settings),
    }
}
