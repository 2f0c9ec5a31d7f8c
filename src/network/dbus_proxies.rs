// D-Bus proxy trait definitions for the wpa_supplicant interfaces.
// These use zbus's #[proxy] macro to auto-generate typed async clients.

use std::collections::HashMap;
use zbus::proxy;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

// ── wpa_supplicant Root Object ────────────────────────────────────────

#[proxy(
    interface = "fi.w1.wpa_supplicant1",
    default_service = "fi.w1.wpa_supplicant1",
    default_path = "/fi/w1/wpa_supplicant1"
)]
pub trait Supplicant {
    /// Register a network interface with wpa_supplicant
    fn create_interface(&self, args: HashMap<&str, Value<'_>>) -> zbus::Result<OwnedObjectPath>;

    /// Interfaces currently controlled by wpa_supplicant
    #[zbus(property)]
    fn interfaces(&self) -> zbus::Result<Vec<OwnedObjectPath>>;
}

// ── Interface ─────────────────────────────────────────────────────────

#[proxy(
    interface = "fi.w1.wpa_supplicant1.Interface",
    default_service = "fi.w1.wpa_supplicant1"
)]
pub trait Interface {
    /// Trigger a scan ("Type" plus optional "SSIDs" filter)
    fn scan(&self, args: HashMap<&str, Value<'_>>) -> zbus::Result<()>;

    /// Add a network configuration, returns its object path
    fn add_network(&self, args: HashMap<&str, Value<'_>>) -> zbus::Result<OwnedObjectPath>;

    /// Remove a network configuration
    fn remove_network(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;

    /// Signal: scan finished, with success flag
    #[zbus(signal)]
    fn scan_done(&self, success: bool) -> zbus::Result<()>;

    /// Signal: one or more interface properties changed
    #[zbus(signal, name = "PropertiesChanged")]
    fn interface_properties_changed(
        &self,
        properties: HashMap<String, OwnedValue>,
    ) -> zbus::Result<()>;

    /// Kernel interface name (e.g., "wlan0")
    #[zbus(property)]
    fn ifname(&self) -> zbus::Result<String>;

    /// Connection state ("disconnected", "completed", ...)
    #[zbus(property)]
    fn state(&self) -> zbus::Result<String>;

    /// Access points found by the last scans
    #[zbus(property, name = "BSSs")]
    fn bsss(&self) -> zbus::Result<Vec<OwnedObjectPath>>;

    /// Configured networks
    #[zbus(property)]
    fn networks(&self) -> zbus::Result<Vec<OwnedObjectPath>>;
}

// ── BSS (access point) ────────────────────────────────────────────────

#[proxy(
    interface = "fi.w1.wpa_supplicant1.BSS",
    default_service = "fi.w1.wpa_supplicant1"
)]
pub trait Bss {
    /// BSSID as raw bytes
    #[zbus(property, name = "BSSID")]
    fn bssid(&self) -> zbus::Result<Vec<u8>>;

    /// SSID as raw bytes
    #[zbus(property, name = "SSID")]
    fn ssid(&self) -> zbus::Result<Vec<u8>>;

    /// Signal strength in dBm
    #[zbus(property)]
    fn signal(&self) -> zbus::Result<i16>;

    /// WPA information element (empty when absent)
    #[zbus(property, name = "WPA")]
    fn wpa(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// RSN information element (empty when absent)
    #[zbus(property, name = "RSN")]
    fn rsn(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// WPS information element (empty when absent)
    #[zbus(property, name = "WPS")]
    fn wps(&self) -> zbus::Result<HashMap<String, OwnedValue>>;
}

// ── Network ───────────────────────────────────────────────────────────

#[proxy(
    interface = "fi.w1.wpa_supplicant1.Network",
    default_service = "fi.w1.wpa_supplicant1"
)]
pub trait Network {
    /// Network block properties; "ssid" is stored quoted
    #[zbus(property)]
    fn properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Whether the network is enabled
    #[zbus(property)]
    fn enabled(&self) -> zbus::Result<bool>;

    /// Enable or disable the network
    #[zbus(property)]
    fn set_enabled(&self, enabled: bool) -> zbus::Result<()>;
}
