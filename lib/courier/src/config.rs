//! Configuration for [`HyperTransport`](crate::HyperTransport).

use std::time::Duration;

/// Configuration for the network transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed for a response to start arriving.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl TransportConfigBuilder {
    /// Set the response timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}
