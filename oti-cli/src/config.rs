//! Monitor configuration
//!
//! Holds the backend URL passed on the command line plus the polling
//! intervals, which can be tuned from the environment.

use std::time::Duration;

use oti_core::scenarios::DEFAULT_PAGE_SIZE;

/// Delay between polls of an unfinished job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Delay between refreshes of the scenario job statuses
pub const DEFAULT_SCENARIO_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the indicators backend (e.g., "http://localhost:8000")
    pub api_url: String,

    /// How often to re-fetch the latest job while it is unfinished
    pub poll_interval: Duration,

    /// How often to refresh the job status shown next to each scenario
    pub scenario_poll_interval: Duration,

    /// Scenarios listed per page
    pub page_size: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            scenario_poll_interval: DEFAULT_SCENARIO_POLL_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates configuration, reading optional overrides from the environment
    ///
    /// Recognized environment variables:
    /// - OTI_POLL_INTERVAL_MS (optional, milliseconds, default: 5000)
    /// - OTI_SCENARIO_POLL_INTERVAL_SECS (optional, seconds, default: 10)
    /// - OTI_PAGE_SIZE (optional, default: 5)
    pub fn from_env(api_url: impl Into<String>) -> Self {
        let mut config = Self::new(api_url);

        if let Some(millis) = env_number::<u64>("OTI_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(millis);
        }

        if let Some(secs) = env_number::<u64>("OTI_SCENARIO_POLL_INTERVAL_SECS") {
            config.scenario_poll_interval = Duration::from_secs(secs);
        }

        if let Some(page_size) = env_number::<usize>("OTI_PAGE_SIZE") {
            config.page_size = page_size;
        }

        config
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.scenario_poll_interval.is_zero() {
            anyhow::bail!("scenario_poll_interval must be greater than 0");
        }

        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }

        Ok(())
    }
}

/// Parse a numeric environment variable, ignoring unset or malformed values
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}
