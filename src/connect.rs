use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::deadline::{self, Deadlines};
use crate::error::{WpasError, WpasResult};
use crate::network::{InterfaceState, NetworkHandle, NetworkSettings, WirelessInterface};
use crate::scan;
use crate::security;

/// Position of a connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStage {
    Idle,
    Scanning,
    Found,
    Authenticating,
    Associating,
    Completed,
    Failed,
}

impl fmt::Display for ConnectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Scanning => write!(f, "Scanning..."),
            Self::Found => write!(f, "Found"),
            Self::Authenticating => write!(f, "Authenticating..."),
            Self::Associating => write!(f, "Associating..."),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Source of the secret for a secured network
pub trait CredentialProvider {
    fn secret_for(&mut self, ssid: &str) -> WpasResult<String>;
}

/// Ask on the terminal without echoing
pub struct PromptCredentials;

impl CredentialProvider for PromptCredentials {
    fn secret_for(&mut self, ssid: &str) -> WpasResult<String> {
        Ok(rpassword::prompt_password(format!(
            "Enter password for \"{ssid}\": "
        ))?)
    }
}

/// A secret supplied up front (e.g. `--password`)
pub struct PresetCredentials(pub String);

impl CredentialProvider for PresetCredentials {
    fn secret_for(&mut self, _ssid: &str) -> WpasResult<String> {
        Ok(self.0.clone())
    }
}

/// Outcome of a successful attempt, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connected {
    pub ssid: String,
    pub secret: Option<String>,
}

/// Drives one network configuration through wpa_supplicant's connection states
pub struct ConnectionController<'a, I: WirelessInterface> {
    iface: &'a I,
    deadlines: Deadlines,
    stage: ConnectionStage,
}

impl<'a, I: WirelessInterface> ConnectionController<'a, I> {
    pub fn new(iface: &'a I, deadlines: Deadlines) -> Self {
        Self {
            iface,
            deadlines,
            stage: ConnectionStage::Idle,
        }
    }

    /// Scan for `ssid`, create a network for it and wait until wpa_supplicant
    /// reports `completed` or `disconnected`. On any failure after the network
    /// was created it is removed again.
    pub async fn connect<P, F>(
        &mut self,
        ssid: &str,
        credentials: &mut P,
        mut on_progress: F,
    ) -> WpasResult<Connected>
    where
        P: CredentialProvider,
        F: FnMut(ConnectionStage),
    {
        if self.iface.networks().await?.iter().any(|n| n.ssid == ssid) {
            return Err(WpasError::AlreadyConnected(ssid.to_string()));
        }

        self.advance(ConnectionStage::Scanning, &mut on_progress);
        let records = match scan::trigger_scan(self.iface, Some(ssid), self.deadlines.scan).await {
            Ok(records) => records,
            Err(e) => {
                self.advance(ConnectionStage::Failed, &mut on_progress);
                return Err(e);
            }
        };

        let Some(record) = records.into_iter().find(|r| r.ssid() == ssid) else {
            self.advance(ConnectionStage::Failed, &mut on_progress);
            return Err(WpasError::connection_failed(ssid, "scan failed"));
        };
        self.advance(ConnectionStage::Found, &mut on_progress);

        let security = security::classify(&record);
        debug!("'{}' at {} is {}", ssid, record.bssid_string(), security);
        let secret = if security.needs_password() {
            Some(credentials.secret_for(ssid)?)
        } else {
            None
        };

        let initial = self.iface.state().await?;
        debug!("{} is {} before connecting", self.iface.name(), initial);

        // Subscribe before the network exists so the first transition is seen
        let mut states = self.iface.watch_state().await?;
        let handle = self
            .iface
            .add_network(&NetworkSettings::new(ssid, secret.as_deref()))
            .await?;

        match self.supervise(ssid, &handle, &mut states, &mut on_progress).await {
            Ok(()) => {
                info!("Connection to '{}' succeeded", ssid);
                Ok(Connected {
                    ssid: ssid.to_string(),
                    secret,
                })
            }
            Err(e) => {
                self.advance(ConnectionStage::Failed, &mut on_progress);
                if let Err(remove_err) = self.iface.remove_network(&handle).await {
                    warn!("Rollback of {} failed: {}", handle, remove_err);
                }
                Err(e)
            }
        }
    }

    async fn supervise<F: FnMut(ConnectionStage)>(
        &mut self,
        ssid: &str,
        handle: &NetworkHandle,
        states: &mut mpsc::UnboundedReceiver<InterfaceState>,
        on_progress: &mut F,
    ) -> WpasResult<()> {
        self.iface.set_network_enabled(handle, true).await?;

        let limit = self.deadlines.connect;
        let what = format!("connection to \"{ssid}\"");
        let terminal = deadline::wait(limit, &what, self.terminal_state(states, on_progress)).await?;

        match terminal {
            Some(InterfaceState::Completed) => {
                self.advance(ConnectionStage::Completed, on_progress);
                Ok(())
            }
            Some(_) => Err(WpasError::connection_failed(ssid, "disconnected")),
            None => Err(WpasError::connection_failed(
                ssid,
                "wpa_supplicant stopped reporting state",
            )),
        }
    }

    /// Consume state changes until `completed` or `disconnected`
    async fn terminal_state<F: FnMut(ConnectionStage)>(
        &mut self,
        states: &mut mpsc::UnboundedReceiver<InterfaceState>,
        on_progress: &mut F,
    ) -> Option<InterfaceState> {
        while let Some(state) = states.recv().await {
            match state {
                InterfaceState::Authenticating => {
                    self.advance(ConnectionStage::Authenticating, on_progress);
                }
                InterfaceState::Associating => {
                    self.advance(ConnectionStage::Associating, on_progress);
                }
                InterfaceState::Completed | InterfaceState::Disconnected => return Some(state),
                InterfaceState::Other(ref other) => {
                    debug!("{} state: {}", self.iface.name(), other);
                }
            }
        }
        None
    }

    fn advance<F: FnMut(ConnectionStage)>(&mut self, stage: ConnectionStage, on_progress: &mut F) {
        debug!("Connection stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        on_progress(stage);
    }

    /// Remove every configured network named `ssid`, returning how many went
    pub async fn remove(&self, ssid: &str) -> WpasResult<usize> {
        let mut removed = 0;
        for network in self.iface.networks().await? {
            if network.ssid == ssid {
                self.iface.remove_network(&network.handle).await?;
                removed += 1;
            }
        }
        if removed == 0 {
            return Err(WpasError::NetworkNotFound(ssid.to_string()));
        }
        Ok(removed)
    }
}
