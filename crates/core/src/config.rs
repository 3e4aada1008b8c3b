//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the stores and the
//! scheduler. Library code never reads environment variables; the binaries read them and hand
//! the raw values to the `*_from_env_value` helpers below.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_FEED_CAP, DEFAULT_TICK_MS};
use crate::{StoreError, StoreResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    seed_sample_data: bool,
    tick_period: Duration,
    feed_cap: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        data_dir: PathBuf,
        seed_sample_data: bool,
        tick_period: Duration,
        feed_cap: usize,
    ) -> StoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidInput("data_dir cannot be empty".into()));
        }
        if tick_period.is_zero() {
            return Err(StoreError::InvalidInput(
                "tick period must be greater than zero".into(),
            ));
        }
        if feed_cap == 0 {
            return Err(StoreError::InvalidInput(
                "notification feed cap must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_dir,
            seed_sample_data,
            tick_period,
            feed_cap,
        })
    }

    /// Configuration with every default applied, rooted at `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> StoreResult<Self> {
        Self::new(
            data_dir,
            true,
            Duration::from_millis(DEFAULT_TICK_MS),
            DEFAULT_FEED_CAP,
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Whether empty or unreadable stores fall back to the built-in sample data.
    ///
    /// When false they start empty instead.
    pub fn seed_sample_data(&self) -> bool {
        self.seed_sample_data
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn feed_cap(&self) -> usize {
        self.feed_cap
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the data directory from an optional string value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_DATA_DIR`] relative to the working directory.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    trimmed(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the seed flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
///
/// If `value` is `None` or blank, seeding is enabled.
pub fn seed_from_env_value(value: Option<String>) -> StoreResult<bool> {
    match trimmed(value).map(|v| v.to_ascii_lowercase()).as_deref() {
        None => Ok(true),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(StoreError::InvalidInput(format!(
            "CAREPORTAL_SEED must be true or false, got '{other}'"
        ))),
    }
}

/// Parse the simulation tick period in milliseconds.
///
/// If `value` is `None` or blank, returns [`DEFAULT_TICK_MS`].
pub fn tick_period_from_env_value(value: Option<String>) -> StoreResult<Duration> {
    let millis = match trimmed(value) {
        None => DEFAULT_TICK_MS,
        Some(v) => v.parse::<u64>().map_err(|e| {
            StoreError::InvalidInput(format!("CAREPORTAL_TICK_MS '{v}' is not a number: {e}"))
        })?,
    };
    if millis == 0 {
        return Err(StoreError::InvalidInput(
            "CAREPORTAL_TICK_MS must be greater than zero".into(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

/// Parse the notification feed cap.
///
/// If `value` is `None` or blank, returns [`DEFAULT_FEED_CAP`].
pub fn feed_cap_from_env_value(value: Option<String>) -> StoreResult<usize> {
    match trimmed(value) {
        None => Ok(DEFAULT_FEED_CAP),
        Some(v) => match v.parse::<usize>() {
            Ok(0) => Err(StoreError::InvalidInput(
                "CAREPORTAL_FEED_CAP must be at least 1".into(),
            )),
            Ok(cap) => Ok(cap),
            Err(e) => Err(StoreError::InvalidInput(format!(
                "CAREPORTAL_FEED_CAP '{v}' is not a number: {e}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert!(seed_from_env_value(None).unwrap());
        assert_eq!(
            tick_period_from_env_value(None).unwrap(),
            Duration::from_millis(DEFAULT_TICK_MS)
        );
        assert_eq!(feed_cap_from_env_value(None).unwrap(), DEFAULT_FEED_CAP);
    }

    #[test]
    fn test_seed_flag_spellings() {
        assert!(seed_from_env_value(Some("YES".into())).unwrap());
        assert!(!seed_from_env_value(Some(" false ".into())).unwrap());
        assert!(!seed_from_env_value(Some("0".into())).unwrap());
        assert!(matches!(
            seed_from_env_value(Some("maybe".into())),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tick_period_rejects_zero_and_garbage() {
        assert!(tick_period_from_env_value(Some("0".into())).is_err());
        assert!(tick_period_from_env_value(Some("soon".into())).is_err());
        assert_eq!(
            tick_period_from_env_value(Some("250".into())).unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_feed_cap_rejects_zero() {
        assert!(feed_cap_from_env_value(Some("0".into())).is_err());
        assert_eq!(feed_cap_from_env_value(Some("7".into())).unwrap(), 7);
    }

    #[test]
    fn test_config_new_validates() {
        assert!(CoreConfig::new(PathBuf::new(), true, Duration::from_secs(1), 5).is_err());
        assert!(CoreConfig::new("data".into(), true, Duration::ZERO, 5).is_err());
        assert!(CoreConfig::new("data".into(), true, Duration::from_secs(1), 0).is_err());

        let cfg = CoreConfig::with_data_dir("data".into()).unwrap();
        assert_eq!(cfg.data_dir(), Path::new("data"));
        assert!(cfg.seed_sample_data());
        assert_eq!(cfg.feed_cap(), DEFAULT_FEED_CAP);
    }
}
