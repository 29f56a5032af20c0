use std::fmt;
use std::io;

use thiserror::Error;

/// The configuration option a [`RetrierError::Configuration`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    MaxRetry,
    RetryDelay,
    ExtraDelay,
}

impl ConfigOption {
    /// Name of the option as it appears in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ConfigOption::MaxRetry => "maxRetry",
            ConfigOption::RetryDelay => "retryDelay",
            ConfigOption::ExtraDelay => "extraDelay",
        }
    }

    pub(crate) fn invalid(self) -> RetrierError {
        let message = match self {
            ConfigOption::MaxRetry | ConfigOption::RetryDelay => {
                format!("The '{}' option must be an integer greater than 0", self.name())
            }
            ConfigOption::ExtraDelay => format!(
                "The '{}' option must be an integer greater than or equal 0",
                self.name()
            ),
        };
        RetrierError::Configuration {
            option: self,
            message,
        }
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error types produced while configuring a [`Retrier`](crate::Retrier).
///
/// Failures of the retried job are never wrapped in this type; `retry`
/// hands the job's own error back unchanged.
#[derive(Debug, Error)]
pub enum RetrierError {
    /// An option was set to a value outside its allowed range
    #[error("{message}")]
    Configuration {
        option: ConfigOption,
        message: String,
    },
    /// Config file could not be read
    #[error("config IO error: {0}")]
    Io(#[from] io::Error),
    /// Config file is not valid TOML
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Config could not be rendered as TOML
    #[error("config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// Environment variable holds something that is not an integer
    #[error("invalid value for {var}: {value:?} is not an integer")]
    InvalidEnv { var: String, value: String },
}

impl RetrierError {
    /// Returns the offending option for configuration errors.
    pub fn option(&self) -> Option<ConfigOption> {
        match self {
            RetrierError::Configuration { option, .. } => Some(*option),
            _ => None,
        }
    }
}
