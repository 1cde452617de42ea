mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use stockroom_core::Stockroom;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "stockroom", &mut std::io::stdout());
            Ok(())
        }

        // Registration talks to the backend without a session
        Command::Register(args) => {
            let stockroom = Stockroom::new(config::build_client_config(&global, false)?)?;
            commands::auth::register(&stockroom, args, &global).await
        }
        Command::SeedDemo => {
            let stockroom = Stockroom::new(config::build_client_config(&global, false)?)?;
            commands::auth::seed_demo(&stockroom, &global).await
        }

        // Everything else: log in, run, log out
        cmd => {
            let client_config = config::build_client_config(&global, true)?;
            tracing::debug!(command = ?cmd, url = %client_config.url, "dispatching command");

            let spinner = connecting_spinner(&global);
            let signed_in = spinner.clone();
            let global = &global;
            let outcome = Stockroom::oneshot(client_config, |stockroom| async move {
                if let Some(bar) = signed_in {
                    bar.finish_and_clear();
                }
                Ok(commands::dispatch(cmd, &stockroom, global).await)
            })
            .await;
            if let Some(bar) = spinner {
                bar.finish_and_clear();
            }

            outcome?
        }
    }
}

/// Spinner on stderr while the session opens, only for interactive use.
fn connecting_spinner(global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Signing in...");
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}
