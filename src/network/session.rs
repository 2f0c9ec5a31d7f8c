use std::collections::HashMap;

use tracing::{debug, info, warn};
use zbus::proxy::CacheProperties;
use zbus::zvariant::{OwnedObjectPath, Value};
use zbus::Connection;

use crate::error::{WpasError, WpasResult};
use crate::network::dbus_proxies::*;
use crate::network::wifi::DbusInterface;

/// Bus connection and wpa_supplicant root object for one command invocation.
/// All daemon handles are derived from here and dropped with it.
pub struct Session {
    connection: Connection,
    supplicant: SupplicantProxy<'static>,
}

impl Session {
    /// Connect to the system D-Bus and reach the wpa_supplicant root object
    pub async fn new() -> WpasResult<Self> {
        let connection = Connection::system().await?;
        let supplicant = SupplicantProxy::builder(&connection)
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        Ok(Self {
            connection,
            supplicant,
        })
    }

    /// Find the wpa_supplicant interface object for `ifname`, registering the
    /// interface with the daemon if it does not control it yet.
    pub async fn bind_interface(&self, ifname: &str) -> WpasResult<DbusInterface> {
        if let Some(path) = self.find_interface(ifname).await? {
            debug!("Interface {} already controlled at {}", ifname, path);
            return DbusInterface::new(&self.connection, path, ifname.to_string()).await;
        }

        let mut args = HashMap::new();
        args.insert("Ifname", Value::from(ifname));
        let path = self.supplicant.create_interface(args).await.map_err(|e| {
            warn!("CreateInterface failed for {}: {}", ifname, e);
            WpasError::no_interface(Some(ifname))
        })?;
        info!("Registered interface {} at {}", ifname, path);

        DbusInterface::new(&self.connection, path, ifname.to_string()).await
    }

    async fn find_interface(&self, ifname: &str) -> WpasResult<Option<OwnedObjectPath>> {
        for path in self.supplicant.interfaces().await? {
            let proxy = InterfaceProxy::builder(&self.connection)
                .path(path.clone())?
                .cache_properties(CacheProperties::No)
                .build()
                .await?;
            match proxy.ifname().await {
                Ok(name) if name == ifname => return Ok(Some(path)),
                Ok(_) => {}
                Err(e) => debug!("Failed to read Ifname of {}: {}", path, e),
            }
        }
        Ok(None)
    }
}
