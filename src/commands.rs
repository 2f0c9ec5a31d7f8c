use std::path::Path;

use tracing::{debug, info};

use crate::config::{ScanArgs, ScanField};
use crate::connect::{
    Connected, ConnectionController, ConnectionStage, CredentialProvider, PresetCredentials,
    PromptCredentials,
};
use crate::credentials::{CredentialStore, LoadOutcome, SkipReason};
use crate::deadline::Deadlines;
use crate::error::WpasResult;
use crate::network::{AccessPointRecord, SignalScale, WirelessInterface};
use crate::scan;
use crate::security;

// ── scan ──────────────────────────────────────────────────────────────

pub async fn scan<I: WirelessInterface>(
    iface: &I,
    args: &ScanArgs,
    deadlines: Deadlines,
    scale: SignalScale,
) -> WpasResult<()> {
    let records = scan::trigger_scan(iface, None, deadlines.scan).await?;
    for line in scan_table(records, args, scale) {
        println!("{line}");
    }
    Ok(())
}

/// Render scan results, header first
pub fn scan_table(
    mut records: Vec<AccessPointRecord>,
    args: &ScanArgs,
    scale: SignalScale,
) -> Vec<String> {
    let fields: &[ScanField] = if args.fields.is_empty() {
        &ScanField::ALL
    } else {
        &args.fields
    };

    if args.sort {
        // Percentages are monotonic in dBm, so sorting on the raw reading is enough
        records.sort_by(|a, b| b.signal.cmp(&a.signal));
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(row(fields, "SSID", "WPA", "RSN", "WPS", "Signal"));
    for record in &records {
        let signal = if args.human_readable {
            format!("{:.0}%", scale.percent(record.signal))
        } else {
            record.signal.to_string()
        };
        lines.push(row(
            fields,
            &record.ssid(),
            yes_no(record.wpa.is_some()),
            yes_no(record.rsn.is_some()),
            yes_no(security::supports_wps(record)),
            &signal,
        ));
    }
    lines
}

fn row(fields: &[ScanField], ssid: &str, wpa: &str, rsn: &str, wps: &str, signal: &str) -> String {
    let mut line = String::new();
    for field in ScanField::ALL.iter().filter(|f| fields.contains(*f)) {
        let cell = match field {
            ScanField::Ssid => format!("{ssid:<35}"),
            ScanField::Wpa => format!("{wpa:<5}"),
            ScanField::Rsn => format!("{rsn:<5}"),
            ScanField::Wps => format!("{wps:<5}"),
            ScanField::Signal => format!("{signal:>6}"),
        };
        line.push_str(&cell);
    }
    line
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// ── list-networks / remove-network ────────────────────────────────────

pub async fn list_networks<I: WirelessInterface>(iface: &I) -> WpasResult<()> {
    for network in iface.networks().await? {
        debug!("{} enabled: {}", network.handle, network.enabled);
        println!("{}", network.ssid);
    }
    Ok(())
}

pub async fn remove_network<I: WirelessInterface>(iface: &I, ssid: &str) -> WpasResult<()> {
    let removed = ConnectionController::new(iface, Deadlines::default())
        .remove(ssid)
        .await?;
    info!("Removed {} network(s) named '{}'", removed, ssid);
    Ok(())
}

// ── connect ───────────────────────────────────────────────────────────

pub async fn connect<I: WirelessInterface>(
    iface: &I,
    ssid: &str,
    save: Option<&Path>,
    password: Option<String>,
    deadlines: Deadlines,
) -> WpasResult<()> {
    let mut controller = ConnectionController::new(iface, deadlines);
    let connected = match password {
        Some(password) => {
            run_connect(&mut controller, ssid, &mut PresetCredentials(password)).await?
        }
        None => run_connect(&mut controller, ssid, &mut PromptCredentials).await?,
    };
    println!("Connection to \"{ssid}\" succeeded");

    if let Some(path) = save {
        CredentialStore::new(path)
            .append(&connected.ssid, connected.secret.as_deref())
            .await?;
    }
    Ok(())
}

async fn run_connect<I: WirelessInterface, P: CredentialProvider>(
    controller: &mut ConnectionController<'_, I>,
    ssid: &str,
    credentials: &mut P,
) -> WpasResult<Connected> {
    controller
        .connect(ssid, credentials, |stage| {
            if matches!(
                stage,
                ConnectionStage::Authenticating | ConnectionStage::Associating
            ) {
                println!("{stage}");
            }
        })
        .await
}

// ── load ──────────────────────────────────────────────────────────────

pub async fn load<I: WirelessInterface>(iface: &I, input: &Path) -> WpasResult<()> {
    let store = CredentialStore::new(input);
    store
        .load(iface, |outcome| match outcome {
            LoadOutcome::Added(ssid) => println!("Adding \"{ssid}\""),
            LoadOutcome::Skipped {
                ssid,
                reason: SkipReason::AlreadyConfigured,
            } => println!("Ignoring \"{ssid}\""),
            LoadOutcome::Skipped { .. } => debug!("Skipping repeated \"{}\"", outcome.ssid()),
        })
        .await?;
    Ok(())
}
