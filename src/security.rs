use std::fmt;

use crate::network::AccessPointRecord;

/// Key management mode of ad-hoc networks without a shared secret
const KEY_MGMT_NONE: &str = "wpa-none";

/// Whether joining an access point needs a secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    Open,
    RequiresSecret,
}

impl Security {
    pub fn needs_password(&self) -> bool {
        matches!(self, Self::RequiresSecret)
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::RequiresSecret => write!(f, "secured"),
        }
    }
}

/// Decide from the WPA element alone. RSN-only access points classify as
/// [`Security::Open`].
pub fn classify(record: &AccessPointRecord) -> Security {
    match record.wpa {
        Some(ref wpa) if wpa.key_mgmt.iter().any(|mode| mode != KEY_MGMT_NONE) => {
            Security::RequiresSecret
        }
        _ => Security::Open,
    }
}

/// WPS counts only when the element advertises a type
pub fn supports_wps(record: &AccessPointRecord) -> bool {
    record
        .wps
        .as_ref()
        .and_then(|wps| wps.wps_type.as_deref())
        .is_some_and(|t| !t.is_empty())
}
