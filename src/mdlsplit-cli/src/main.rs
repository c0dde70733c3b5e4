//! mdlsplit - split single models out of an extracted content pack

mod cli;
mod commands;
mod config;
mod prompt;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use commands::{root_or_cwd, Outcome, Settings};
use config::{validate_prefix, Config};

/// Exit status when the user cancels at a prompt.
const EXIT_CANCELLED: u8 = 130;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn settings(cli_prefix: Option<String>) -> Result<Settings> {
    let config = Config::load()?;
    let prefix = cli_prefix.unwrap_or_else(|| config.prefix().to_string());
    validate_prefix(&prefix)?;

    Ok(Settings {
        prefix,
        page_size: config.page_size(),
    })
}

fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Some(Commands::Configure {
            export_prefix,
            page_size,
            show,
        }) => commands::configure::handle(export_prefix, page_size, show),

        Some(Commands::List { root }) => {
            commands::list::handle(&root_or_cwd(root), &settings(cli.prefix)?)
        }

        Some(Commands::Export { root, select }) => {
            commands::export::batch(&root_or_cwd(root), &select, &settings(cli.prefix)?)
        }

        Some(Commands::Deps { model, root, json }) => {
            commands::deps::handle(&root_or_cwd(root), &model, json, &settings(cli.prefix)?)
        }

        None => commands::export::interactive(&root_or_cwd(cli.root), &settings(cli.prefix)?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Cancelled) => ExitCode::from(EXIT_CANCELLED),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
