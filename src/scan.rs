use std::time::Duration;

use tracing::debug;

use crate::deadline;
use crate::error::{WpasError, WpasResult};
use crate::network::{AccessPointRecord, ScanRequest, WirelessInterface};

/// Run an active scan and return the access points known afterwards.
///
/// The completion listener is installed before the request goes out, so a
/// daemon that finishes instantly is still observed. `ssid` narrows the scan
/// to one network name.
pub async fn trigger_scan<I: WirelessInterface>(
    iface: &I,
    ssid: Option<&str>,
    limit: Option<Duration>,
) -> WpasResult<Vec<AccessPointRecord>> {
    let done = iface.watch_scan_done().await?;

    let request = ScanRequest {
        ssid: ssid.map(str::to_string),
    };
    iface.request_scan(&request).await?;

    let what = format!("scan on \"{}\"", iface.name());
    // A dropped sender means the signal stream ended without a ScanDone
    let success = deadline::wait(limit, &what, done).await?.unwrap_or(false);
    if !success {
        return Err(WpasError::ScanFailed(iface.name().to_string()));
    }

    let records = iface.access_points().await?;
    debug!("Scan on {} found {} access points", iface.name(), records.len());
    Ok(records)
}
