//! Client configuration.

use api_client::ApiClient;
use std::time::Duration;
use swipe::SwipeThresholds;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7777";

/// Settings for one client session.
///
/// ## Usage
/// ```ignore
/// let config = ClientConfig::new("https://api.devfinder.dev")
///     .with_request_timeout(Duration::from_secs(5))
///     .with_premium_polling(Duration::from_secs(1), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bound on every request, including decision dispatch
    pub request_timeout: Duration,
    /// Bound on `PATCH /profile/edit`
    pub profile_timeout: Duration,
    pub thresholds: SwipeThresholds,
    pub premium_poll_interval: Duration,
    pub premium_poll_attempts: u32,
    /// Checkout key used when the payment order does not carry one
    pub checkout_key: Option<String>,
    /// Public site address used for canonical links
    pub site_url: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: api_client::DEFAULT_TIMEOUT,
            profile_timeout: Duration::from_secs(10),
            thresholds: SwipeThresholds::default(),
            premium_poll_interval: Duration::from_secs(2),
            premium_poll_attempts: 10,
            checkout_key: None,
            site_url: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_profile_timeout(mut self, timeout: Duration) -> Self {
        self.profile_timeout = timeout;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SwipeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_premium_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.premium_poll_interval = interval;
        self.premium_poll_attempts = attempts;
        self
    }

    pub fn with_checkout_key(mut self, key: impl Into<String>) -> Self {
        self.checkout_key = Some(key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    pub fn build_client(&self) -> api_client::Result<ApiClient> {
        ApiClient::with_timeout(&self.base_url, self.request_timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:7777");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.premium_poll_interval, Duration::from_secs(2));
        assert_eq!(config.premium_poll_attempts, 10);
        assert_eq!(config.thresholds.offset, 120.0);
    }

    #[test]
    fn test_blank_checkout_key_is_ignored() {
        let config = ClientConfig::default().with_checkout_key("  ");
        assert_eq!(config.checkout_key, None);

        let config = ClientConfig::default().with_checkout_key("rzp_test");
        assert_eq!(config.checkout_key.as_deref(), Some("rzp_test"));
    }

    #[test]
    fn test_build_client_uses_timeout() {
        let config = ClientConfig::new("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_millis(250));
        let client = config.build_client().unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(250));
        assert!(ClientConfig::new("::bad::").build_client().is_err());
    }
}
