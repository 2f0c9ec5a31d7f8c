use tokio::process::Command;
use tracing::debug;

use crate::error::{WpasError, WpasResult};

/// Pick the first wireless (`wl*`) link reported by `ip -o link`
pub async fn detect_wireless_ifname() -> WpasResult<String> {
    let output = Command::new("ip")
        .args(["-o", "link"])
        .output()
        .await
        .map_err(|e| {
            debug!("Failed to run ip: {}", e);
            WpasError::no_interface(None)
        })?;

    if !output.status.success() {
        return Err(WpasError::no_interface(None));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    first_wireless_link(&stdout).ok_or_else(|| WpasError::no_interface(None))
}

/// Parse `ip -o link` output. Each line reads `<index>: <name>[@<parent>]: <flags> ...`.
fn first_wireless_link(ip_output: &str) -> Option<String> {
    ip_output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|field| field.strip_suffix(':'))
        .map(|name| name.split('@').next().unwrap_or(name))
        .find(|name| name.starts_with("wl"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_LINK: &str = "\
1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN mode DEFAULT group default qlen 1000\\    link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00
2: enp3s0: <BROADCAST,MULTICAST> mtu 1500 qdisc fq_codel state DOWN mode DEFAULT group default qlen 1000\\    link/ether 3c:7c:3f:00:00:01 brd ff:ff:ff:ff:ff:ff
3: wlp2s0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue state UP mode DORMANT group default qlen 1000\\    link/ether 60:f2:62:00:00:02 brd ff:ff:ff:ff:ff:ff
4: wlan1: <BROADCAST,MULTICAST> mtu 1500 qdisc noop state DOWN mode DEFAULT group default qlen 1000\\    link/ether 60:f2:62:00:00:03 brd ff:ff:ff:ff:ff:ff
";

    #[test]
    fn picks_first_wireless_link() {
        assert_eq!(first_wireless_link(IP_LINK), Some("wlp2s0".to_string()));
    }

    #[test]
    fn strips_parent_suffix() {
        let out = "7: wlan0@phy0: <BROADCAST> mtu 1500\n";
        assert_eq!(first_wireless_link(out), Some("wlan0".to_string()));
    }

    #[test]
    fn no_wireless_link() {
        let out = "1: lo: <LOOPBACK> mtu 65536\n2: eth0: <BROADCAST> mtu 1500\n";
        assert_eq!(first_wireless_link(out), None);
    }
}
