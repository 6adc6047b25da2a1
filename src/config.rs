use crate::error::{PosError, Result};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8000/api/payments/";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Where the gateway lives and how often an open order is re-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    base_url: Url,
    poll_interval: Duration,
}

impl GatewayConfig {
    /// Builds a config from raw settings (CLI flags or environment).
    ///
    /// # Arguments
    ///
    /// * `base_url` - Gateway API root, e.g. `http://127.0.0.1:8000/api/payments`.
    /// * `poll_interval_ms` - Delay between status checks. Must be non-zero.
    pub fn new(base_url: &str, poll_interval_ms: u64) -> Result<Self> {
        let poll_interval = checked_interval(Duration::from_millis(poll_interval_ms))?;

        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|e| PosError::Config(format!("invalid gateway URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(PosError::Config(format!(
                "gateway URL '{base_url}' cannot be used as a base"
            )));
        }

        Ok(Self {
            base_url,
            poll_interval,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self> {
        self.poll_interval = checked_interval(poll_interval)?;
        Ok(self)
    }

    /// Base URL of the gateway API. Always ends in `/` so endpoints can be joined onto it.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// A zero period would make the polling ticker panic.
pub(crate) fn checked_interval(interval: Duration) -> Result<Duration> {
    if interval.is_zero() {
        return Err(PosError::Config(
            "poll interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_GATEWAY_URL).expect("default gateway URL is valid"),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}
