//! Deployment stage the service runs in

use std::fmt;

use tracing::Level;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Local development
    Development,
}

impl Environment {
    /// Parses an environment name as found in `APP_ENV`
    ///
    /// # Panics
    ///
    /// Panics if the value is not one of `production`, `staging` or `development`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let env = value.trim().to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Log level used when `LOG_LEVEL` is not set
    #[must_use]
    pub const fn default_log_level(&self) -> Level {
        match self {
            Self::Production | Self::Staging => Level::INFO,
            Self::Development => Level::DEBUG,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        };
        f.write_str(name)
    }
}
