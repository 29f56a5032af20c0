use std::env;
use std::fs;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigOption, RetrierError};

const DEFAULT_MAX_RETRY: NonZeroU32 = match NonZeroU32::new(3) {
    Some(value) => value,
    None => unreachable!(),
};
const DEFAULT_RETRY_DELAY_MS: NonZeroU64 = match NonZeroU64::new(500) {
    Some(value) => value,
    None => unreachable!(),
};
const DEFAULT_EXTRA_DELAY_MS: u64 = 0;

pub(crate) const ENV_MAX_RETRY: &str = "RETRIER_MAX_RETRY";
pub(crate) const ENV_RETRY_DELAY: &str = "RETRIER_RETRY_DELAY";
pub(crate) const ENV_EXTRA_DELAY: &str = "RETRIER_EXTRA_DELAY";

/// Attempt budget and delays used by a [`Retrier`](crate::Retrier).
///
/// The field types make an invalid configuration unrepresentable: at least
/// one attempt, a non-zero base delay, and a non-negative increment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRetrierConfig")]
pub struct RetrierConfig {
    /// Maximum number of attempts, the first one included
    max_retry: NonZeroU32,
    /// Delay before the first attempt in milliseconds
    retry_delay: NonZeroU64,
    /// Milliseconds added to the delay after each failed attempt
    extra_delay: u64,
}

impl Default for RetrierConfig {
    fn default() -> Self {
        Self {
            max_retry: DEFAULT_MAX_RETRY,
            retry_delay: DEFAULT_RETRY_DELAY_MS,
            extra_delay: DEFAULT_EXTRA_DELAY_MS,
        }
    }
}

impl RetrierConfig {
    /// Builds a config, validating each value in turn.
    pub fn new(max_retry: i64, retry_delay: i64, extra_delay: i64) -> Result<Self, RetrierError> {
        let mut cfg = Self::default();
        cfg.set_max_retry(max_retry)?;
        cfg.set_retry_delay(retry_delay)?;
        cfg.set_extra_delay(extra_delay)?;
        Ok(cfg)
    }

    pub fn set_max_retry(&mut self, max_retry: i64) -> Result<(), RetrierError> {
        self.max_retry = u32::try_from(max_retry)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| ConfigOption::MaxRetry.invalid())?;
        Ok(())
    }

    pub fn set_retry_delay(&mut self, retry_delay: i64) -> Result<(), RetrierError> {
        self.retry_delay = u64::try_from(retry_delay)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or_else(|| ConfigOption::RetryDelay.invalid())?;
        Ok(())
    }

    pub fn set_extra_delay(&mut self, extra_delay: i64) -> Result<(), RetrierError> {
        self.extra_delay =
            u64::try_from(extra_delay).map_err(|_| ConfigOption::ExtraDelay.invalid())?;
        Ok(())
    }

    pub fn max_retry(&self) -> u32 {
        self.max_retry.get()
    }

    pub fn retry_delay(&self) -> u64 {
        self.retry_delay.get()
    }

    pub fn extra_delay(&self) -> u64 {
        self.extra_delay
    }

    /// Delay waited before the given 1-based attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let increments = u64::from(attempt.saturating_sub(1));
        self.retry_delay()
            .saturating_add(increments.saturating_mul(self.extra_delay))
    }

    /// Parses a TOML document such as `max_retry = 5`.
    ///
    /// Missing keys keep their defaults. Out-of-range values are reported as
    /// [`RetrierError::Configuration`].
    pub fn from_toml_str(contents: &str) -> Result<Self, RetrierError> {
        let raw: RawRetrierConfig = toml::from_str(contents)?;
        raw.try_into()
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RetrierError> {
        let path = path.as_ref();
        log::debug!("loading retrier config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builds a config from `RETRIER_MAX_RETRY`, `RETRIER_RETRY_DELAY` and
    /// `RETRIER_EXTRA_DELAY`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, RetrierError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, RetrierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| -> Result<Option<i64>, RetrierError> {
            match lookup(var) {
                None => Ok(None),
                Some(value) => value
                    .trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| RetrierError::InvalidEnv {
                        var: var.to_string(),
                        value,
                    }),
            }
        };

        RawRetrierConfig {
            max_retry: read(ENV_MAX_RETRY)?,
            retry_delay: read(ENV_RETRY_DELAY)?,
            extra_delay: read(ENV_EXTRA_DELAY)?,
        }
        .try_into()
    }

    pub fn to_toml_string(&self) -> Result<String, RetrierError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Unvalidated form of [`RetrierConfig`] as it appears in config sources.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawRetrierConfig {
    #[serde(alias = "maxRetry")]
    max_retry: Option<i64>,
    #[serde(alias = "retryDelay")]
    retry_delay: Option<i64>,
    #[serde(alias = "extraDelay")]
    extra_delay: Option<i64>,
}

impl TryFrom<RawRetrierConfig> for RetrierConfig {
    type Error = RetrierError;

    fn try_from(raw: RawRetrierConfig) -> Result<Self, Self::Error> {
        let mut cfg = RetrierConfig::default();
        if let Some(max_retry) = raw.max_retry {
            cfg.set_max_retry(max_retry)?;
        }
        if let Some(retry_delay) = raw.retry_delay {
            cfg.set_retry_delay(retry_delay)?;
        }
        if let Some(extra_delay) = raw.extra_delay {
            cfg.set_extra_delay(extra_delay)?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
