//! `stockroom-tui`: terminal front end for the stockroom inventory backend.
//!
//! Screens follow the route gate: anonymous users see the login form,
//! signed-in users get the dashboard, products, suppliers, and inventory
//! logs, and administrators additionally get reports.
//!
//! Logs are written to a file (default `/tmp/stockroom-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod session_bridge;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stockroom_config::{ConfigError, DEFAULT_SERVER, PASSWORD_ENV};
use stockroom_core::{ClientConfig, Credentials, Stockroom, TlsVerification};

use crate::app::App;
use crate::event::Rates;

/// Terminal client for the stockroom inventory backend.
#[derive(Parser, Debug)]
#[command(name = "stockroom-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "STOCKROOM_PROFILE")]
    profile: Option<String>,

    /// Backend URL, overriding the profile (e.g., http://localhost:7090)
    #[arg(short = 'S', long, env = "STOCKROOM_SERVER")]
    server: Option<String>,

    /// Sign in as this email (password from STOCKROOM_PASSWORD)
    #[arg(short, long, env = "STOCKROOM_EMAIL")]
    email: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Spinner and toast clock, in Hz
    #[arg(long, default_value_t = 4, value_name = "HZ")]
    tick_rate: u32,

    /// Redraws per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log file path (defaults to /tmp/stockroom-tui.log)
    #[arg(long, default_value = "/tmp/stockroom-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI owns
/// the terminal. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stockroom_tui={log_level},stockroom_core={log_level},stockroom_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("stockroom-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Connection settings: config profile, then flag and env overrides.
///
/// A missing default profile is fine (local backend, manual login); a
/// missing profile asked for by name is not.
fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    let cfg = stockroom_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let mut config = match cfg.profile(&profile_name) {
        Ok(profile) => stockroom_config::profile_to_client_config(profile, &profile_name)?,
        Err(ConfigError::UnknownProfile(name)) if cli.profile.is_some() => {
            return Err(eyre!("profile '{name}' not found"));
        }
        Err(_) => ClientConfig::new(DEFAULT_SERVER.parse()?),
    };

    if let Some(ref server) = cli.server {
        config.url = server
            .parse()
            .map_err(|e| eyre!("invalid server URL '{server}': {e}"))?;
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(ref email) = cli.email {
        config.credentials = std::env::var(PASSWORD_ENV).ok().map(|pw| Credentials {
            email: email.clone(),
            password: SecretString::from(pw),
        });
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_client_config(&cli)?;
    info!(
        server = %config.url,
        auto_login = config.credentials.is_some(),
        "starting stockroom-tui"
    );

    let stockroom = Stockroom::new(config)?;
    let mut app = App::new(stockroom, Rates::from_hz(cli.tick_rate, cli.fps));
    app.run().await?;

    Ok(())
}
