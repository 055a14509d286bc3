//! Roster integration for Sentry.

use anyhow::{Context, Result};
use roster_settings::Settings;
use sentry::IntoDsn;

/// Sets up Sentry.
///
/// The returned guard must be held for the duration of the program. Once it is
/// dropped, no more errors will be reported.
pub fn init_sentry(settings: &Settings) -> Result<sentry::ClientInitGuard> {
    let dsn = settings
        .sentry
        .dsn()
        .into_dsn()
        .context("Parsing the Sentry DSN")?;
    let environment = settings
        .sentry
        .env
        .clone()
        .unwrap_or_else(|| settings.env.clone());

    let mut config = sentry::apply_defaults(sentry::ClientOptions {
        dsn,
        debug: settings.sentry.debug(),
        release: sentry::release_name!(),
        environment: Some(environment.into()),
        ..Default::default()
    });

    if settings.sentry.debug() {
        config = config.add_integration(SentryTracer);
    };

    Ok(sentry::init(config))
}

/// Emit tracing::debug events for every Sentry event.
struct SentryTracer;

impl sentry::Integration for SentryTracer {
    fn name(&self) -> &'static str {
        "sentry-tracer"
    }

    fn setup(&self, _options: &mut sentry::ClientOptions) {
        tracing::debug!("setting up SentryTracer");
    }

    fn process_event(
        &self,
        event: sentry::protocol::Event<'static>,
        _options: &sentry::ClientOptions,
    ) -> Option<sentry::protocol::Event<'static>> {
        let exceptions: Vec<_> = event
            .exception
            .values
            .iter()
            .map(|exc| format!("{}: {}", exc.ty, exc.value.as_deref().unwrap_or("--")))
            .collect();

        tracing::debug!(
            r#type = "app.sentry.event",
            event_id = %event.event_id,
            ?exceptions,
            "A sentry error was sent"
        );

        Some(event)
    }
}
