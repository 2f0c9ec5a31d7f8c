use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::dbus_proxies::InterfaceProxy;
use super::types::{ov_to_string, InterfaceState};
use crate::error::WpasResult;

/// Subscribe to the next `ScanDone` signal of an interface.
///
/// The match rule is registered before this returns, so a scan requested
/// afterwards cannot complete unobserved. A background task forwards the
/// success flag into the returned single-slot channel.
pub async fn next_scan_done(proxy: &InterfaceProxy<'static>) -> WpasResult<oneshot::Receiver<bool>> {
    let mut stream = proxy.receive_scan_done().await?;
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Some(signal) = stream.next().await {
            let success = match signal.args() {
                Ok(args) => *args.success(),
                Err(e) => {
                    warn!("Malformed ScanDone signal: {}", e);
                    false
                }
            };
            debug!("ScanDone received (success: {})", success);
            let _ = tx.send(success);
        }
    });

    Ok(rx)
}

/// Subscribe to `State` changes of an interface.
///
/// Every `PropertiesChanged` signal carrying a `State` entry is forwarded as an
/// [`InterfaceState`]; other property updates are dropped. The forwarding task
/// ends once the receiver is dropped.
pub async fn state_changes(
    proxy: &InterfaceProxy<'static>,
) -> WpasResult<mpsc::UnboundedReceiver<InterfaceState>> {
    let mut stream = proxy.receive_interface_properties_changed().await?;
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(signal) = stream.next().await {
            let args = match signal.args() {
                Ok(args) => args,
                Err(e) => {
                    warn!("Malformed PropertiesChanged signal: {}", e);
                    continue;
                }
            };
            let Some(state) = args.properties().get("State").and_then(ov_to_string) else {
                continue;
            };
            if tx.send(InterfaceState::from_wpas(&state)).is_err() {
                break;
            }
        }
        debug!("State listener stopped");
    });

    Ok(rx)
}
