use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::info;

use crate::network::SignalScale;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time, always available as the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// Command line tool for simple wpa_supplicant management
#[derive(Parser, Debug, Clone)]
#[command(name = "wpas", version, about, long_about = None)]
pub struct CliArgs {
    /// The wireless interface name (overrides config file)
    #[arg(long, global = true)]
    pub ifname: Option<String>,

    /// Log level filter (overrides config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    /// Path to a custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan for access points (default)
    Scan(ScanArgs),

    /// List configured networks
    ListNetworks,

    /// Remove every configured network with this ssid
    RemoveNetwork {
        ssid: String,
    },

    /// Connect to a network and wait for the result
    Connect {
        ssid: String,

        /// Save (append) connection data to a file for later use with "load"
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Password to use instead of prompting
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Load connection information from a file, ignoring duplicates
    Load {
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Fields to display
    #[arg(short, long, value_enum)]
    pub fields: Vec<ScanField>,

    /// Sort by signal strength
    #[arg(short, long)]
    pub sort: bool,

    /// Print signal strength as a percentage
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanField {
    Ssid,
    Wpa,
    Rsn,
    Wps,
    Signal,
}

impl ScanField {
    pub const ALL: [ScanField; 5] = [Self::Ssid, Self::Wpa, Self::Rsn, Self::Wps, Self::Signal];
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration, parsed from TOML and then overridden by CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub signal: SignalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Wireless interface (empty string = auto-detect)
    pub interface: String,

    /// Log level
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Scan completion deadline in seconds (0 = none)
    pub scan_secs: u64,

    /// Connection deadline in seconds (0 = none)
    pub connect_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub floor_dbm: i16,
    pub ceil_dbm: i16,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interface: String::new(),
            log_level: "warn".into(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        let scale = SignalScale::default();
        Self {
            floor_dbm: scale.floor_dbm,
            ceil_dbm: scale.ceil_dbm,
        }
    }
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/wpas/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wpas")
            .join("config.toml")
    }

    /// Convenience: interface as Option<&str> (empty = None)
    pub fn interface(&self) -> Option<&str> {
        let iface = self.general.interface.trim();
        if iface.is_empty() {
            None
        } else {
            Some(iface)
        }
    }

    pub fn signal_scale(&self) -> SignalScale {
        SignalScale {
            floor_dbm: self.signal.floor_dbm,
            ceil_dbm: self.signal.ceil_dbm,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.signal.ceil_dbm <= self.signal.floor_dbm {
            color_eyre::eyre::bail!(
                "signal.ceil_dbm ({}) must be above signal.floor_dbm ({})",
                self.signal.ceil_dbm,
                self.signal.floor_dbm
            );
        }
        Ok(())
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If the default file doesn't exist, create directory tree + write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => {
            let path = Config::config_path();
            if !path.exists() {
                bootstrap(&path);
            }
            path
        }
    };

    let mut config = if config_path.exists() {
        let toml_str = std::fs::read_to_string(&config_path)
            .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;
        parse(&toml_str).wrap_err_with(|| {
            format!(
                "Failed to parse config at {}.\n\
                 Delete the file to regenerate defaults, or run:\n  \
                 wpas --print-default-config > {:?}",
                config_path.display(),
                config_path
            )
        })?
    } else if cli.config.is_some() {
        color_eyre::eyre::bail!("Config file {} does not exist", config_path.display());
    } else {
        parse(DEFAULT_CONFIG_TOML)?
    };

    // ── CLI overrides ───────────────────────────────────────────────
    if let Some(ref iface) = cli.ifname {
        config.general.interface = iface.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Write the defaults to `path`. Failure (e.g. a read-only home) only means
/// the embedded defaults are used.
fn bootstrap(path: &std::path::Path) {
    let written = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(path, DEFAULT_CONFIG_TOML));
    match written {
        Ok(()) => info!("Created default config at {}", path.display()),
        Err(e) => info!("Could not write default config to {}: {}", path.display(), e),
    }
}

fn parse(toml_str: &str) -> Result<Config> {
    Ok(toml::from_str(toml_str)?)
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_code_defaults() {
        let config = parse(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.interface(), None);
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.timeouts.scan_secs, 0);
        assert_eq!(config.timeouts.connect_secs, 0);
        assert_eq!(config.signal_scale(), SignalScale::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse("[timeouts]\nconnect_secs = 45\n").unwrap();
        assert_eq!(config.timeouts.connect_secs, 45);
        assert_eq!(config.timeouts.scan_secs, 0);
        assert_eq!(config.signal.floor_dbm, -100);
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ninterface = \"wlan0\"\n").unwrap();

        let cli = CliArgs::parse_from([
            "wpas",
            "--config",
            path.to_str().unwrap(),
            "--ifname",
            "wlp3s0",
            "list-networks",
        ]);
        let config = load(&cli).unwrap();

        assert_eq!(config.interface(), Some("wlp3s0"));
    }

    #[test]
    fn inverted_signal_scale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[signal]\nfloor_dbm = -20\nceil_dbm = -100\n").unwrap();

        let cli = CliArgs::parse_from(["wpas", "--config", path.to_str().unwrap()]);
        assert!(load(&cli).is_err());
    }

    #[test]
    fn scan_is_default_and_fields_are_repeatable() {
        let cli = CliArgs::parse_from(["wpas"]);
        assert!(cli.command.is_none());

        let cli = CliArgs::parse_from(["wpas", "scan", "-f", "ssid", "-f", "signal", "-s", "-H"]);
        match cli.command {
            Some(Command::Scan(args)) => {
                assert_eq!(args.fields, vec![ScanField::Ssid, ScanField::Signal]);
                assert!(args.sort);
                assert!(args.human_readable);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn connect_takes_save_file() {
        let cli = CliArgs::parse_from(["wpas", "connect", "home", "--save", "/tmp/nets"]);
        match cli.command {
            Some(Command::Connect { ssid, save, password }) => {
                assert_eq!(ssid, "home");
                assert_eq!(save, Some(PathBuf::from("/tmp/nets")));
                assert_eq!(password, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
