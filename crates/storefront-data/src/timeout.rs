//! Timeout configuration for fetch operations.

use std::time::Duration;

/// Default time allowed for a whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total operation timeout, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 2,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total() {
        let config = TimeoutConfig::from_total(Duration::from_secs(3));
        assert_eq!(config.connect, Duration::from_millis(1500));
        assert_eq!(TimeoutConfig::default().total, DEFAULT_TIMEOUT);
    }
}
