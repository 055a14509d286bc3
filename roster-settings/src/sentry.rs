//! Settings for error reporting.

use serde::{Deserialize, Serialize};

/// Settings for Sentry error reporting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentrySettings {
    /// How, if at all, errors are reported.
    pub mode: SentryMode,

    /// The DSN to report to. Required unless `mode` is `disabled`.
    pub dsn: Option<String>,

    /// The environment name attached to reported events.
    pub env: Option<String>,
}

/// The ways Sentry can be configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentryMode {
    /// Don't report anything.
    Disabled,

    /// Report errors to the configured DSN.
    Release,

    /// Report errors to the configured DSN, and log every event sent.
    Debug,
}

impl SentrySettings {
    /// The DSN to use, or `None` if reporting is disabled.
    pub fn dsn(&self) -> Option<&str> {
        match self.mode {
            SentryMode::Disabled => None,
            SentryMode::Release | SentryMode::Debug => self.dsn.as_deref(),
        }
    }

    /// Whether Sentry should log the events it sends.
    pub fn debug(&self) -> bool {
        self.mode == SentryMode::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::{SentryMode, SentrySettings};

    #[test]
    fn test_disabled_mode_hides_dsn() {
        let settings = SentrySettings {
            mode: SentryMode::Disabled,
            dsn: Some("https://public@sentry.example.com/1".to_string()),
            env: None,
        };
        assert_eq!(settings.dsn(), None);
        assert!(!settings.debug());
    }

    #[test]
    fn test_debug_mode_reports_and_logs() {
        let settings = SentrySettings {
            mode: SentryMode::Debug,
            dsn: Some("https://public@sentry.example.com/1".to_string()),
            env: Some("stage".to_string()),
        };
        assert_eq!(settings.dsn(), Some("https://public@sentry.example.com/1"));
        assert!(settings.debug());
    }
}
