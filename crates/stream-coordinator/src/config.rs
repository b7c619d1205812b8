//! Coordinator configuration.
//!
//! Defaults are embedded; every knob can be overridden through
//! `LIMELIGHT_*` environment variables for host applications that prefer
//! deploy-time tuning over code changes.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default page limit for the regular item grid.
pub const DEFAULT_ITEM_PAGE_LIMIT: usize = 4;

/// Default page limit for the grid while a screen share is active.
pub const DEFAULT_SCREEN_PAGE_LIMIT: usize = 4;

/// Default delay before a reconciliation pass issues pause/resume, to
/// dampen churn from rapid topology flips.
pub const DEFAULT_PAUSE_DEBOUNCE_MS: u64 = 100;

/// Default minimum wall-clock gap between loudness-triggered reorders.
pub const DEFAULT_REORDER_INTERVAL_MS: u64 = 5_000;

/// Default gap applied instead when loudness is strongly above threshold.
pub const DEFAULT_FAST_REORDER_INTERVAL_MS: u64 = 2_000;

/// Coordinator configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Bound on the limited-stream set in regular grid layouts.
    pub item_page_limit: usize,

    /// Bound on the limited-stream set while screen share is active.
    pub screen_page_limit: usize,

    /// Delay before a reconciliation pass issues pause/resume.
    pub pause_debounce: Duration,

    /// Minimum gap between loudness-triggered reorders.
    pub reorder_interval: Duration,

    /// Minimum gap when loudness is strongly above threshold.
    pub fast_reorder_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            item_page_limit: DEFAULT_ITEM_PAGE_LIMIT,
            screen_page_limit: DEFAULT_SCREEN_PAGE_LIMIT,
            pause_debounce: Duration::from_millis(DEFAULT_PAUSE_DEBOUNCE_MS),
            reorder_interval: Duration::from_millis(DEFAULT_REORDER_INTERVAL_MS),
            fast_reorder_interval: Duration::from_millis(DEFAULT_FAST_REORDER_INTERVAL_MS),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl CoordinatorConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `LIMELIGHT_ITEM_PAGE_LIMIT`,
    /// `LIMELIGHT_SCREEN_PAGE_LIMIT`, `LIMELIGHT_PAUSE_DEBOUNCE_MS`,
    /// `LIMELIGHT_REORDER_INTERVAL_MS`, `LIMELIGHT_FAST_REORDER_INTERVAL_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            item_page_limit: parse_var("LIMELIGHT_ITEM_PAGE_LIMIT")?
                .unwrap_or(defaults.item_page_limit),
            screen_page_limit: parse_var("LIMELIGHT_SCREEN_PAGE_LIMIT")?
                .unwrap_or(defaults.screen_page_limit),
            pause_debounce: parse_var("LIMELIGHT_PAUSE_DEBOUNCE_MS")?
                .map_or(defaults.pause_debounce, Duration::from_millis),
            reorder_interval: parse_var("LIMELIGHT_REORDER_INTERVAL_MS")?
                .map_or(defaults.reorder_interval, Duration::from_millis),
            fast_reorder_interval: parse_var("LIMELIGHT_FAST_REORDER_INTERVAL_MS")?
                .map_or(defaults.fast_reorder_interval, Duration::from_millis),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                var: "LIMELIGHT_ITEM_PAGE_LIMIT".to_string(),
                reason: "page limit must be at least 1".to_string(),
            });
        }
        if self.screen_page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                var: "LIMELIGHT_SCREEN_PAGE_LIMIT".to_string(),
                reason: "page limit must be at least 1".to_string(),
            });
        }
        if self.fast_reorder_interval > self.reorder_interval {
            return Err(ConfigError::InvalidValue {
                var: "LIMELIGHT_FAST_REORDER_INTERVAL_MS".to_string(),
                reason: "fast interval must not exceed the normal interval".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse an optional environment variable.
fn parse_var<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.item_page_limit, DEFAULT_ITEM_PAGE_LIMIT);
        assert_eq!(config.screen_page_limit, DEFAULT_SCREEN_PAGE_LIMIT);
        assert_eq!(config.pause_debounce, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_limit_rejected() {
        let config = CoordinatorConfig {
            item_page_limit: 0,
            ..CoordinatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fast_interval_must_not_exceed_normal() {
        let config = CoordinatorConfig {
            reorder_interval: Duration::from_secs(1),
            fast_reorder_interval: Duration::from_secs(5),
            ..CoordinatorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
