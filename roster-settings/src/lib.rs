#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # Roster Settings
//!
//! Configuration is specified in several ways, with later methods overriding earlier ones.
//!
//! 1. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 2. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `ROSTER_ENV`. The
//!    settings for that environment are then loaded from `config/${env}.yaml`, if
//!    it exists. The default environment is "development". A "production"
//!    environment is also provided.
//! 3. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is safe to use for
//!    local configuration if desired.
//! 4. Environment variables that begin with `ROSTER_` and have a separator for
//!    `__`. For example, `Settings::upstream::url` can be controlled from the
//!    environment variable `ROSTER_UPSTREAM__URL`.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.
//!
//! Configuration files are canonically YAML files. However, any format supported
//! by the [config] crate can be used, including JSON and TOML. To choose another
//! format, simply use a different extension for your file, like
//! `config/local.toml`.

mod logging;
mod sentry;

pub use logging::{DirectiveWrapper, LogFormat, LoggingSettings};
pub use sentry::{SentryMode, SentrySettings};

use config::{Config, ConfigError, Environment, File};
use http::Uri;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, DurationMilliSeconds};
use std::{net::SocketAddr, time::Duration};

/// Top level settings object for Roster.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// The environment Roster is running in. Should only be set with the
    /// `ROSTER_ENV` environment variable.
    pub env: String,

    /// Enable additional features to debug the application. This should not be
    /// set to true in production environments.
    pub debug: bool,

    /// URL to redirect to from the root of the service. If not set, the root
    /// describes the service as JSON instead.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub public_documentation: Option<Uri>,

    /// Log the full text of incoming questions. Questions can contain personal
    /// information, so this should stay off outside of development.
    pub log_full_request: bool,

    /// Settings for the HTTP server.
    pub http: HttpSettings,

    /// Settings for the upstream messages API.
    pub upstream: UpstreamSettings,

    /// The fixed answers given when no record can be returned.
    pub answers: AnswerSettings,

    /// Logging settings.
    pub logging: LoggingSettings,

    /// Metrics settings.
    pub metrics: MetricsSettings,

    /// Settings for error reporting via Sentry.
    pub sentry: SentrySettings,
}

/// Settings for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSettings {
    /// The host and port to listen on, such as "127.0.0.1:8080" or "0.0.0.0:80".
    pub listen: SocketAddr,

    /// The number of workers to use. Optional. If no value is provided, the
    /// number of logical cores will be used.
    pub workers: Option<usize>,
}

/// Settings for the upstream API that message records are fetched from.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// The URL to fetch messages from. Only the first page it returns is used.
    pub url: String,

    /// The bound on the whole upstream request, in milliseconds. A request that
    /// takes longer is treated like any other fetch failure.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_ms")]
    pub timeout: Duration,

    /// User-Agent sent with every upstream request.
    pub user_agent: String,
}

/// Answers given when no message can be returned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerSettings {
    /// The answer when the upstream API yields no usable records.
    pub fetch_failed: String,

    /// The answer when no record is similar enough to the question.
    pub no_match: String,
}

/// Settings for the StatsD client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// The host to send metrics to.
    pub sink_host: String,

    /// The UDP port to send metrics to.
    pub sink_port: u16,

    /// The maximum number of metrics to hold in memory before dropping them.
    pub max_queue_size: usize,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, or if any of the required
    /// configuration files are missing.
    pub fn load() -> Result<Self, ConfigError> {
        let roster_env = std::env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("./config/base"))
            .set_override("env", roster_env.as_str())?
            // Merge in an environment specific config.
            .add_source(File::with_name(&format!("config/{}", roster_env)).required(false))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables that start with "ROSTER_" and have "__"
            // to separate levels. For example, `ROSTER_HTTP__LISTEN` maps to
            // `Settings::http::listen`.
            .add_source(
                Environment::with_prefix("ROSTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Load settings from configuration files for tests.
    ///
    /// Paths are relative to a crate directory in the workspace, which is the
    /// working directory cargo uses when running tests.
    ///
    /// # Panics
    /// If the test configuration can't be loaded.
    pub fn load_for_tests() -> Self {
        Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("../config/base"))
            // Merge in test specific config.
            .set_override("env", "test")
            .expect("Could not set env for tests")
            .add_source(File::with_name("../config/test"))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("../config/local_test").required(false))
            .build()
            .expect("Could not load settings for tests")
            .try_deserialize()
            .expect("Could not convert settings")
    }
}

#[cfg(test)]
mod tests {
    use super::{SentryMode, Settings};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_settings_load() {
        let settings = Settings::load_for_tests();

        assert_eq!(settings.env, "test");
        assert_eq!(settings.http.listen.port(), 0);
        assert_eq!(settings.upstream.timeout, Duration::from_secs(15));
        assert_eq!(
            settings.answers.fetch_failed,
            "Could not fetch data from the API."
        );
        assert_eq!(settings.answers.no_match, "I couldn't find a clear answer.");
        assert_eq!(settings.sentry.mode, SentryMode::Disabled);
    }

    #[test]
    fn test_timeout_serializes_as_milliseconds() {
        let settings = Settings::load_for_tests();
        let value = serde_json::to_value(&settings).expect("could not serialize settings");

        assert_eq!(value["upstream"]["timeout_ms"], 15_000);
    }
}
