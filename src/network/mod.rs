pub mod dbus_proxies;
pub mod link;
pub mod session;
pub mod signals;
pub mod types;
pub mod wifi;

#[cfg(test)]
pub mod fake;

use tokio::sync::{mpsc, oneshot};

use crate::error::WpasResult;

pub use session::Session;
pub use types::*;
pub use wifi::DbusInterface;

/// A wireless interface bound in wpa_supplicant.
///
/// The core operations (scan, connect, load) are generic over this trait so
/// they can run against the real daemon or an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait WirelessInterface {
    /// Kernel interface name
    fn name(&self) -> &str;

    /// Current connection state
    async fn state(&self) -> WpasResult<InterfaceState>;

    /// Snapshots of all access points currently known to the daemon
    async fn access_points(&self) -> WpasResult<Vec<AccessPointRecord>>;

    /// All configured networks
    async fn networks(&self) -> WpasResult<Vec<ConfiguredNetwork>>;

    /// Register for the next scan completion. Must be called before
    /// [`request_scan`](Self::request_scan).
    async fn watch_scan_done(&self) -> WpasResult<oneshot::Receiver<bool>>;

    async fn request_scan(&self, request: &ScanRequest) -> WpasResult<()>;

    /// Register for connection state changes. Must be called before the
    /// mutation whose transitions should be observed.
    async fn watch_state(&self) -> WpasResult<mpsc::UnboundedReceiver<InterfaceState>>;

    async fn add_network(&self, settings: &NetworkSettings) -> WpasResult<NetworkHandle>;

    async fn set_network_enabled(&self, network: &NetworkHandle, enabled: bool) -> WpasResult<()>;

    async fn remove_network(&self, network: &NetworkHandle) -> WpasResult<()>;
}
