//! In-memory stand-in for a wpa_supplicant interface.
//!
//! Events (`ScanDone`, state changes) are delivered synchronously from inside
//! the call that triggers them, and only to listeners registered at that
//! moment. A caller that subscribes after issuing the request misses the event,
//! which shows up in [`FakeInterface::missed_events`].

use std::sync::Mutex;

use tokio::sync::{mpsc, oneshot};
use zbus::zvariant::ObjectPath;

use super::types::*;
use super::WirelessInterface;
use crate::error::{WpasError, WpasResult};

#[derive(Default)]
struct FakeState {
    state: Option<InterfaceState>,
    visible: Vec<AccessPointRecord>,
    scan_results: Vec<AccessPointRecord>,
    scan_outcome: Option<bool>,
    connect_script: Vec<InterfaceState>,
    fail_enable: bool,
    networks: Vec<(NetworkHandle, NetworkSettings, bool)>,
    next_id: u32,
    scan_waiters: Vec<oneshot::Sender<bool>>,
    state_watchers: Vec<mpsc::UnboundedSender<InterfaceState>>,
    scans: Vec<ScanRequest>,
    added: Vec<NetworkSettings>,
    enable_calls: usize,
    removed: Vec<NetworkHandle>,
    missed_events: usize,
}

pub struct FakeInterface {
    name: String,
    inner: Mutex<FakeState>,
}

impl FakeInterface {
    /// A fake whose scans succeed and find nothing
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inner: Mutex::new(FakeState {
                scan_outcome: Some(true),
                ..Default::default()
            }),
        }
    }

    /// Pre-existing network configuration
    pub fn with_network(self, ssid: &str, psk: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let handle = next_handle(&mut inner);
            inner
                .networks
                .push((handle, NetworkSettings::new(ssid, psk), true));
        }
        self
    }

    /// Access points that become visible once a scan completes
    pub fn with_scan_results(self, records: Vec<AccessPointRecord>) -> Self {
        self.inner.lock().unwrap().scan_results = records;
        self
    }

    /// `Some(flag)` reports ScanDone with that flag; `None` never reports
    pub fn with_scan_outcome(self, outcome: Option<bool>) -> Self {
        self.inner.lock().unwrap().scan_outcome = outcome;
        self
    }

    /// States emitted when a network gets enabled
    pub fn with_connect_script(self, states: Vec<InterfaceState>) -> Self {
        self.inner.lock().unwrap().connect_script = states;
        self
    }

    pub fn with_failing_enable(self) -> Self {
        self.inner.lock().unwrap().fail_enable = true;
        self
    }

    pub fn scans(&self) -> Vec<ScanRequest> {
        self.inner.lock().unwrap().scans.clone()
    }

    pub fn added(&self) -> Vec<NetworkSettings> {
        self.inner.lock().unwrap().added.clone()
    }

    pub fn enable_calls(&self) -> usize {
        self.inner.lock().unwrap().enable_calls
    }

    pub fn removed(&self) -> Vec<NetworkHandle> {
        self.inner.lock().unwrap().removed.clone()
    }

    pub fn configured(&self) -> Vec<NetworkSettings> {
        let inner = self.inner.lock().unwrap();
        inner.networks.iter().map(|(_, s, _)| s.clone()).collect()
    }

    pub fn missed_events(&self) -> usize {
        self.inner.lock().unwrap().missed_events
    }
}

fn next_handle(inner: &mut FakeState) -> NetworkHandle {
    let path = format!("/fi/w1/wpa_supplicant1/Interfaces/0/Networks/{}", inner.next_id);
    inner.next_id += 1;
    NetworkHandle(ObjectPath::try_from(path).unwrap().into())
}

impl WirelessInterface for FakeInterface {
    fn name(&self) -> &str {
        &self.name
    }

    async fn state(&self) -> WpasResult<InterfaceState> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.state.clone().unwrap_or(InterfaceState::Disconnected))
    }

    async fn access_points(&self) -> WpasResult<Vec<AccessPointRecord>> {
        Ok(self.inner.lock().unwrap().visible.clone())
    }

    async fn networks(&self) -> WpasResult<Vec<ConfiguredNetwork>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .networks
            .iter()
            .map(|(handle, settings, enabled)| ConfiguredNetwork {
                handle: handle.clone(),
                ssid: settings.ssid.clone(),
                enabled: *enabled,
            })
            .collect())
    }

    async fn watch_scan_done(&self) -> WpasResult<oneshot::Receiver<bool>> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().unwrap().scan_waiters.push(tx);
        Ok(rx)
    }

    async fn request_scan(&self, request: &ScanRequest) -> WpasResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.scans.push(request.clone());

        let Some(success) = inner.scan_outcome else {
            return Ok(());
        };
        if success {
            inner.visible = inner.scan_results.clone();
        }

        let waiters: Vec<_> = inner.scan_waiters.drain(..).collect();
        if waiters.is_empty() {
            inner.missed_events += 1;
        }
        for waiter in waiters {
            let _ = waiter.send(success);
        }
        Ok(())
    }

    async fn watch_state(&self) -> WpasResult<mpsc::UnboundedReceiver<InterfaceState>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().unwrap().state_watchers.push(tx);
        Ok(rx)
    }

    async fn add_network(&self, settings: &NetworkSettings) -> WpasResult<NetworkHandle> {
        let mut inner = self.inner.lock().unwrap();
        let handle = next_handle(&mut inner);
        inner.added.push(settings.clone());
        inner.networks.push((handle.clone(), settings.clone(), false));
        Ok(handle)
    }

    async fn set_network_enabled(&self, network: &NetworkHandle, enabled: bool) -> WpasResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.enable_calls += 1;
        if inner.fail_enable {
            return Err(WpasError::PermissionDenied("fake enable failure".into()));
        }

        let entry = inner
            .networks
            .iter_mut()
            .find(|(handle, _, _)| handle == network)
            .ok_or_else(|| WpasError::NetworkNotFound(network.to_string()))?;
        entry.2 = enabled;
        if !enabled {
            return Ok(());
        }

        let script = inner.connect_script.clone();
        for state in script {
            inner.state_watchers.retain(|tx| !tx.is_closed());
            if inner.state_watchers.is_empty() {
                inner.missed_events += 1;
            }
            for tx in &inner.state_watchers {
                let _ = tx.send(state.clone());
            }
            inner.state = Some(state);
        }
        Ok(())
    }

    async fn remove_network(&self, network: &NetworkHandle) -> WpasResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.networks.len();
        inner.networks.retain(|(handle, _, _)| handle != network);
        if inner.networks.len() == before {
            return Err(WpasError::NetworkNotFound(network.to_string()));
        }
        inner.removed.push(network.clone());
        Ok(())
    }
}

/// Access point without WPA, RSN or WPS elements
pub fn open_ap(ssid: &str, signal: i16) -> AccessPointRecord {
    AccessPointRecord {
        bssid: vec![0x02, 0, 0, 0, 0, 0x01],
        ssid_bytes: ssid.as_bytes().to_vec(),
        signal,
        wpa: None,
        rsn: None,
        wps: None,
    }
}

/// Access point advertising a WPA element with the given key management modes
pub fn wpa_ap(ssid: &str, key_mgmt: &[&str]) -> AccessPointRecord {
    AccessPointRecord {
        wpa: Some(KeyMgmtElement {
            key_mgmt: key_mgmt.iter().map(|s| s.to_string()).collect(),
        }),
        ..open_ap(ssid, -50)
    }
}
