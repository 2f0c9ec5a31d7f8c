use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use zbus::proxy::CacheProperties;
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use super::dbus_proxies::*;
use super::signals;
use super::types::*;
use super::WirelessInterface;
use crate::error::WpasResult;

/// An interface object of wpa_supplicant, reached over the system bus
pub struct DbusInterface {
    connection: Connection,
    proxy: InterfaceProxy<'static>,
    name: String,
}

impl DbusInterface {
    pub async fn new(connection: &Connection, path: OwnedObjectPath, name: String) -> WpasResult<Self> {
        let proxy = InterfaceProxy::builder(connection)
            .path(path)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        Ok(Self {
            connection: connection.clone(),
            proxy,
            name,
        })
    }

    async fn bss_proxy(&self, path: &OwnedObjectPath) -> WpasResult<BssProxy<'static>> {
        Ok(BssProxy::builder(&self.connection)
            .path(path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }

    async fn network_proxy(&self, path: &OwnedObjectPath) -> WpasResult<NetworkProxy<'static>> {
        Ok(NetworkProxy::builder(&self.connection)
            .path(path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }

    async fn access_point_info(&self, path: &OwnedObjectPath) -> WpasResult<AccessPointRecord> {
        let proxy = self.bss_proxy(path).await?;

        let ssid_bytes = proxy.ssid().await?;
        let bssid = proxy.bssid().await.unwrap_or_default();
        let signal = proxy.signal().await?;
        let wpa = proxy.wpa().await.unwrap_or_default();
        let rsn = proxy.rsn().await.unwrap_or_default();
        let wps = proxy.wps().await.unwrap_or_default();

        Ok(AccessPointRecord {
            bssid,
            ssid_bytes,
            signal,
            wpa: KeyMgmtElement::from_dict(&wpa),
            rsn: KeyMgmtElement::from_dict(&rsn),
            wps: WpsElement::from_dict(&wps),
        })
    }
}

impl WirelessInterface for DbusInterface {
    fn name(&self) -> &str {
        &self.name
    }

    async fn state(&self) -> WpasResult<InterfaceState> {
        let state = self.proxy.state().await?;
        Ok(InterfaceState::from_wpas(&state))
    }

    async fn access_points(&self) -> WpasResult<Vec<AccessPointRecord>> {
        let paths = self.proxy.bsss().await?;
        let mut records = Vec::with_capacity(paths.len());

        for path in &paths {
            match self.access_point_info(path).await {
                Ok(record) => records.push(record),
                // BSS objects can expire between listing and reading them
                Err(e) => warn!("Failed to read BSS {}: {}", path, e),
            }
        }

        Ok(records)
    }

    async fn networks(&self) -> WpasResult<Vec<ConfiguredNetwork>> {
        let paths = self.proxy.networks().await?;
        let mut networks = Vec::with_capacity(paths.len());

        for path in paths {
            let proxy = self.network_proxy(&path).await?;
            let properties = proxy.properties().await?;
            let enabled = proxy.enabled().await.unwrap_or(false);
            networks.push(ConfiguredNetwork::from_properties(
                NetworkHandle(path),
                &properties,
                enabled,
            )?);
        }

        Ok(networks)
    }

    async fn watch_scan_done(&self) -> WpasResult<oneshot::Receiver<bool>> {
        signals::next_scan_done(&self.proxy).await
    }

    async fn request_scan(&self, request: &ScanRequest) -> WpasResult<()> {
        self.proxy.scan(request.to_args()).await?;
        debug!("Scan requested on {} ({:?})", self.name, request.ssid);
        Ok(())
    }

    async fn watch_state(&self) -> WpasResult<mpsc::UnboundedReceiver<InterfaceState>> {
        signals::state_changes(&self.proxy).await
    }

    async fn add_network(&self, settings: &NetworkSettings) -> WpasResult<NetworkHandle> {
        let path = self.proxy.add_network(settings.to_args()).await?;
        info!("Added network '{}': {}", settings.ssid, path);
        Ok(NetworkHandle(path))
    }

    async fn set_network_enabled(&self, network: &NetworkHandle, enabled: bool) -> WpasResult<()> {
        let proxy = self.network_proxy(&network.0).await?;
        proxy.set_enabled(enabled).await?;
        debug!("Network {} enabled: {}", network, enabled);
        Ok(())
    }

    async fn remove_network(&self, network: &NetworkHandle) -> WpasResult<()> {
        self.proxy.remove_network(&network.0.as_ref()).await?;
        info!("Removed network: {}", network);
        Ok(())
    }
}
