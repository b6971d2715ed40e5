//! Provider capabilities and rate limiting configuration.

use std::time::Duration;

/// Describes what a market data provider can do.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Whether the provider supports historical price fetching.
    pub supports_historical: bool,

    /// Whether the provider supports instrument search.
    pub supports_search: bool,
}

/// Rate limiting configuration for a provider.
///
/// Sync jobs pace their calls with `min_delay` and wait `backoff` before
/// repeating a call that failed with a transient error.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Minimum delay between requests.
    pub min_delay: Duration,

    /// Delay before retrying a rate-limited or timed-out request.
    pub backoff: Duration,
}

impl RateLimit {
    /// Delay to keep between consecutive calls: the larger of `min_delay` and
    /// the spacing implied by `requests_per_minute`.
    pub fn pacing(&self) -> Duration {
        let per_request = Duration::from_secs(60)
            .checked_div(self.requests_per_minute)
            .unwrap_or(Duration::ZERO);
        self.min_delay.max(per_request)
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            min_delay: Duration::from_millis(100),
            backoff: Duration::from_secs(2),
        }
    }
}
