use tracing::{info, warn};

use crate::error::WpasError;

/// wpa_supplicant's D-Bus policy usually restricts mutations to root
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Log up front when a mutating command runs without root
pub fn check_permissions() {
    if is_root() {
        info!("Running as root, full access");
    } else {
        warn!("Not running as root; wpa_supplicant may reject changes");
    }
}

/// Turn D-Bus access-denied failures into [`WpasError::PermissionDenied`]
/// with a hint; every other error passes through unchanged.
pub fn explain_denied(err: WpasError) -> WpasError {
    if !matches!(err, WpasError::Dbus(_) | WpasError::DbusFdo(_)) {
        return err;
    }
    let err_str = err.to_string();
    if err_str.contains("org.freedesktop.DBus.Error.AccessDenied")
        || err_str.contains("PermissionDenied")
    {
        let tip = if is_root() {
            "check the D-Bus policy of wpa_supplicant"
        } else {
            "Tip: run with sudo"
        };
        return WpasError::PermissionDenied(format!("{err_str} ({tip})"));
    }
    err
}
