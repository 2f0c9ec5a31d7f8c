use std::collections::HashMap;
use std::fmt;

use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::error::{WpasError, WpasResult};

/// Connection state of a wpa_supplicant interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceState {
    Disconnected,
    Authenticating,
    Associating,
    Completed,
    /// Any other daemon state, passed through unmodified
    Other(String),
}

impl InterfaceState {
    pub fn from_wpas(state: &str) -> Self {
        match state {
            "disconnected" => Self::Disconnected,
            "authenticating" => Self::Authenticating,
            "associating" => Self::Associating,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Associating => write!(f, "associating"),
            Self::Completed => write!(f, "completed"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// WPA or RSN information element advertised by an access point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMgmtElement {
    pub key_mgmt: Vec<String>,
}

impl KeyMgmtElement {
    /// wpa_supplicant reports an absent element as an empty dictionary.
    pub fn from_dict(dict: &HashMap<String, OwnedValue>) -> Option<Self> {
        if dict.is_empty() {
            return None;
        }
        let key_mgmt = dict
            .get("KeyMgmt")
            .and_then(ov_to_strings)
            .unwrap_or_default();
        Some(Self { key_mgmt })
    }
}

/// WPS information element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpsElement {
    /// Advertised WPS type ("pbc", "pin", ...); empty when none is advertised
    pub wps_type: Option<String>,
}

impl WpsElement {
    pub fn from_dict(dict: &HashMap<String, OwnedValue>) -> Option<Self> {
        if dict.is_empty() {
            return None;
        }
        let wps_type = dict.get("Type").and_then(ov_to_string);
        Some(Self { wps_type })
    }
}

/// Snapshot of one discovered access point (BSS)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPointRecord {
    pub bssid: Vec<u8>,
    pub ssid_bytes: Vec<u8>,
    /// Signal strength in dBm
    pub signal: i16,
    pub wpa: Option<KeyMgmtElement>,
    pub rsn: Option<KeyMgmtElement>,
    pub wps: Option<WpsElement>,
}

impl AccessPointRecord {
    pub fn ssid(&self) -> String {
        String::from_utf8_lossy(&self.ssid_bytes).to_string()
    }

    /// BSSID formatted as a colon separated MAC address
    pub fn bssid_string(&self) -> String {
        self.bssid
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Daemon handle of a configured network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkHandle(pub OwnedObjectPath);

impl fmt::Display for NetworkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

/// A network already present in the daemon's configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredNetwork {
    pub handle: NetworkHandle,
    /// Stored ssid with the surrounding quotes removed
    pub ssid: String,
    pub enabled: bool,
}

impl ConfiguredNetwork {
    /// Parse the `Properties` dictionary of a network object. The ssid is
    /// required; anything else in the dictionary is ignored.
    pub fn from_properties(
        handle: NetworkHandle,
        properties: &HashMap<String, OwnedValue>,
        enabled: bool,
    ) -> WpasResult<Self> {
        let ssid = properties
            .get("ssid")
            .and_then(ov_to_string)
            .ok_or_else(|| WpasError::Parse(format!("network {handle} has no ssid property")))?;
        Ok(Self {
            handle,
            ssid: unquote_ssid(&ssid).to_string(),
            enabled,
        })
    }
}

/// Properties for a new network block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub ssid: String,
    pub psk: Option<String>,
}

impl NetworkSettings {
    pub fn new(ssid: &str, psk: Option<&str>) -> Self {
        Self {
            ssid: ssid.to_string(),
            psk: psk.map(str::to_string),
        }
    }

    pub fn to_args(&self) -> HashMap<&str, Value<'_>> {
        let mut args = HashMap::new();
        args.insert("ssid", Value::from(self.ssid.as_str()));
        if let Some(ref psk) = self.psk {
            args.insert("psk", Value::from(psk.as_str()));
        }
        args
    }
}

/// Parameters of a scan request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Narrow an active scan to a single ssid
    pub ssid: Option<String>,
}

impl ScanRequest {
    pub fn to_args(&self) -> HashMap<&str, Value<'_>> {
        let mut args = HashMap::new();
        args.insert("Type", Value::from("active"));
        if let Some(ref ssid) = self.ssid {
            args.insert("SSIDs", Value::from(vec![ssid.as_bytes().to_vec()]));
        }
        args
    }
}

/// Reference points for turning dBm into a percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalScale {
    pub floor_dbm: i16,
    pub ceil_dbm: i16,
}

impl Default for SignalScale {
    fn default() -> Self {
        Self {
            floor_dbm: -100,
            ceil_dbm: -20,
        }
    }
}

impl SignalScale {
    /// Linear map of `floor_dbm..=ceil_dbm` onto `0..=100`. Values outside the
    /// range extrapolate, they are not clamped.
    pub fn percent(&self, signal_dbm: i16) -> f64 {
        let span = f64::from(self.ceil_dbm) - f64::from(self.floor_dbm);
        100.0 * (f64::from(signal_dbm) - f64::from(self.floor_dbm)) / span
    }
}

/// Signal strength percentage with the default -100/-20 dBm reference points
pub fn signal_strength(signal_dbm: i16) -> f64 {
    SignalScale::default().percent(signal_dbm)
}

/// Strip the quotes wpa_supplicant stores around text ssids.
/// Hex encoded ssids are stored without quotes and pass through unchanged.
pub fn unquote_ssid(stored: &str) -> &str {
    stored
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|s| !s.is_empty())
        .unwrap_or(stored)
}

// ── Safe OwnedValue extraction via pattern matching ───────────────────
// OwnedValue derefs to Value<'static>, so &**v gives &Value to match on.

pub fn ov_to_string(v: &OwnedValue) -> Option<String> {
    match &**v {
        Value::Str(s) => Some(s.to_string()),
        _ => None,
    }
}

pub fn ov_to_strings(v: &OwnedValue) -> Option<Vec<String>> {
    match &**v {
        Value::Array(arr) => {
            let mut strings = Vec::new();
            for item in arr.iter() {
                match item {
                    Value::Str(s) => strings.push(s.to_string()),
                    _ => return None,
                }
            }
            Some(strings)
        }
        _ => None,
    }
}
