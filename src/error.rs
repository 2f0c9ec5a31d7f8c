use thiserror::Error;

/// Unified error type for wpas
#[derive(Error, Debug)]
pub enum WpasError {
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("D-Bus fdo error: {0}")]
    DbusFdo(#[from] zbus::fdo::Error),

    #[error("{0}")]
    NoUsableInterface(String),

    #[error("failed to scan for access points with \"{0}\"")]
    ScanFailed(String),

    #[error("Already connected to network \"{0}\"")]
    AlreadyConnected(String),

    #[error("Connection to \"{ssid}\" failed: {reason}")]
    ConnectionFailed { ssid: String, reason: String },

    #[error("Not connected to network \"{0}\"")]
    NetworkNotFound(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WpasError {
    pub fn no_interface(name: Option<&str>) -> Self {
        match name {
            Some(name) => Self::NoUsableInterface(format!("Invalid interface \"{name}\"")),
            None => Self::NoUsableInterface(
                "Can't find a wireless interface. Specify with --ifname.".into(),
            ),
        }
    }

    pub fn connection_failed(ssid: &str, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            ssid: ssid.to_string(),
            reason: reason.into(),
        }
    }
}

pub type WpasResult<T> = Result<T, WpasError>;
