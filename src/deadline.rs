use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{WpasError, WpasResult};

/// Upper bounds for the two suspension points of a command.
/// `None` waits for the daemon indefinitely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadlines {
    pub scan: Option<Duration>,
    pub connect: Option<Duration>,
}

impl Deadlines {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scan: secs(config.timeouts.scan_secs),
            connect: secs(config.timeouts.connect_secs),
        }
    }
}

fn secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

/// Await `fut`, failing with [`WpasError::Timeout`] once `limit` elapses
pub async fn wait<F: Future>(limit: Option<Duration>, what: &str, fut: F) -> WpasResult<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| WpasError::Timeout(format!("{what} after {}s", limit.as_secs_f32()))),
        None => Ok(fut.await),
    }
}
