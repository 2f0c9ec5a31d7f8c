mod auth;
mod commands;
mod config;
mod connect;
mod credentials;
mod deadline;
mod error;
mod network;
mod scan;
mod security;

use std::io;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{CliArgs, Command, Config, ScanArgs};
use crate::deadline::Deadlines;
use crate::error::WpasResult;
use crate::network::{link, DbusInterface, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();
    color_eyre::install()?;

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    let config = config::load(&cli)?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.general.log_level, cli.log.as_deref())?;

    info!("wpas starting");

    let ifname = match config.interface() {
        Some(name) => name.to_string(),
        None => link::detect_wireless_ifname().await?,
    };

    let session = Session::new()
        .await
        .wrap_err("Failed to reach wpa_supplicant on the system D-Bus. Is it running?")?;
    let iface = session.bind_interface(&ifname).await?;

    let command = cli.command.unwrap_or(Command::Scan(ScanArgs::default()));
    run(command, &iface, &config)
        .await
        .map_err(auth::explain_denied)?;

    info!("wpas exiting");
    Ok(())
}

async fn run(command: Command, iface: &DbusInterface, config: &Config) -> WpasResult<()> {
    let deadlines = Deadlines::from_config(config);

    match command {
        Command::Scan(args) => {
            commands::scan(iface, &args, deadlines, config.signal_scale()).await
        }
        Command::ListNetworks => commands::list_networks(iface).await,
        Command::RemoveNetwork { ssid } => {
            auth::check_permissions();
            commands::remove_network(iface, &ssid).await
        }
        Command::Connect {
            ssid,
            save,
            password,
        } => {
            auth::check_permissions();
            commands::connect(iface, &ssid, save.as_deref(), password, deadlines).await
        }
        Command::Load { input } => {
            auth::check_permissions();
            commands::load(iface, &input).await
        }
    }
}

/// Initialize tracing to stderr, or to a log file when one is given
fn init_logging(level: &str, log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_path {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
            Ok(None)
        }
    }
}
