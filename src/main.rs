// ABOUTME: Entry point for the harmonia CLI application.
// ABOUTME: Parses arguments, sets up tracing, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{CommandError, ConfigSnafu, Session};
use harmonia::config::{self, Config};
use harmonia::output::{Output, OutputMode};
use snafu::ResultExt;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));
    output.start_timer();

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<(), CommandError> {
    let cwd = env::current_dir()
        .map_err(harmonia::error::Error::from)
        .context(ConfigSnafu)?;

    if let Commands::Init { app, force } = &cli.command {
        config::init_config(&cwd, app.as_deref(), *force).context(ConfigSnafu)?;
        output.success(&format!("Created {}", config::CONFIG_FILENAME));
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::discover(&cwd),
    }
    .context(ConfigSnafu)?;
    let session = Session::connect(config)?;

    match &cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Status(args) => commands::status(&session, &args.env, output).await,
        Commands::Watch(args) => commands::watch(&session, &args.env, output).await,
        Commands::Start(args) => commands::start(&session, args, output).await,
        Commands::Stop(args) => commands::stop(&session, args, output).await,
        Commands::Delete(args) => commands::delete(&session, args, output).await,
    }
}
