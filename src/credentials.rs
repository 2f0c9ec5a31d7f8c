//! Append-only log of saved ssid/secret pairs.
//!
//! Each line is a JSON array `["ssid", "secret"]`, with `null` in place of the
//! secret for open networks. Lines are only ever appended; replaying the file
//! skips entries that are already configured, so loading twice is harmless.

use std::collections::HashSet;
use std::path::PathBuf;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::error::{WpasError, WpasResult};
use crate::network::{NetworkSettings, WirelessInterface};

/// One saved connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub ssid: String,
    pub secret: Option<String>,
}

impl CredentialRecord {
    pub fn to_line(&self) -> WpasResult<String> {
        let mut line = serde_json::to_string(&(&self.ssid, &self.secret))?;
        line.push('\n');
        Ok(line)
    }

    pub fn parse_line(line: &str) -> serde_json::Result<Self> {
        let (ssid, secret): (String, Option<String>) = serde_json::from_str(line)?;
        Ok(Self { ssid, secret })
    }

    /// Secret to configure; an empty secret means an open network
    fn psk(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A network with this ssid is already configured in wpa_supplicant
    AlreadyConfigured,
    /// The ssid appeared earlier in the same file
    Duplicate,
}

/// What `load` did with one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Added(String),
    Skipped { ssid: String, reason: SkipReason },
}

impl LoadOutcome {
    pub fn ssid(&self) -> &str {
        match self {
            Self::Added(ssid) | Self::Skipped { ssid, .. } => ssid,
        }
    }
}

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record, creating the file if needed
    pub async fn append(&self, ssid: &str, secret: Option<&str>) -> WpasResult<()> {
        let record = CredentialRecord {
            ssid: ssid.to_string(),
            secret: secret.map(str::to_string),
        };
        let line = record.to_line()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!("Saved '{}' to {}", ssid, self.path.display());
        Ok(())
    }

    /// Replay the file against `iface`.
    ///
    /// New ssids get a network added and enabled without waiting for the
    /// connection. A malformed line stops the replay with a parse error;
    /// networks added before it stay configured.
    pub async fn load<I, F>(&self, iface: &I, mut report: F) -> WpasResult<Vec<LoadOutcome>>
    where
        I: WirelessInterface,
        F: FnMut(&LoadOutcome),
    {
        let configured: HashSet<String> = iface
            .networks()
            .await?
            .into_iter()
            .map(|n| n.ssid)
            .collect();

        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut visited = HashSet::new();
        let mut outcomes = Vec::new();
        let mut line_no = 0;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let record = CredentialRecord::parse_line(&line).map_err(|e| {
                WpasError::Parse(format!("{}:{}: {}", self.path.display(), line_no, e))
            })?;

            let outcome = if !visited.insert(record.ssid.clone()) {
                debug!("Duplicate entry for '{}' on line {}", record.ssid, line_no);
                LoadOutcome::Skipped {
                    ssid: record.ssid,
                    reason: SkipReason::Duplicate,
                }
            } else if configured.contains(&record.ssid) {
                LoadOutcome::Skipped {
                    ssid: record.ssid,
                    reason: SkipReason::AlreadyConfigured,
                }
            } else {
                let settings = NetworkSettings::new(&record.ssid, record.psk());
                let handle = iface.add_network(&settings).await?;
                iface.set_network_enabled(&handle, true).await?;
                LoadOutcome::Added(record.ssid)
            };

            report(&outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
