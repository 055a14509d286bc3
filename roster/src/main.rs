// Only overview documentation that is not relevant to one of the more specific
// crates should go here.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A web API that answers questions about members from their public messages.
//!
//! Roster is split into several subcrates that work in collaboration.
//!
//! - [roster-answer](../roster_answer/index.html)
//! - [roster-integration-tests](../roster_integration_tests/index.html)
//! - [roster-settings](../roster_settings/index.html)
//! - [roster-web](../roster_web/index.html)

mod docs;
mod sentry;

use anyhow::{Context, Result};
use cadence::{BufferedUdpMetricSink, QueuingMetricSink, StatsdClient};
use roster_settings::{LogFormat, Settings};
use std::net::{TcpListener, UdpSocket};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Primary entry point
#[actix_rt::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Loading settings")?;
    init_logging(&settings).context("Setting up logging")?;
    let _sentry_guard = sentry::init_sentry(&settings).context("Setting up Sentry")?;
    let metrics_client = init_metrics(&settings).context("Setting up metrics")?;
    let listener = TcpListener::bind(settings.http.listen).context("Binding port")?;

    tracing::info!(
        r#type = "app.starting",
        env = %settings.env,
        listen = %settings.http.listen,
        "Starting Roster"
    );

    roster_web::run(listener, metrics_client, settings)
        .context("Starting roster-web server")?
        .await
        .context("Running roster-web server")?;

    Ok(())
}

/// Set up logging for Roster, based on settings and the `RUST_LOG` environment variable.
fn init_logging(settings: &Settings) -> Result<()> {
    LogTracer::init()?;
    let env_filter: EnvFilter = (&settings.logging.levels).into();

    match settings.logging.format {
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                .pretty()
                .finish()
                .with(env_filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                .compact()
                .finish()
                .with(env_filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                .json()
                .with_current_span(true)
                .finish()
                .with(env_filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    };

    Ok(())
}

/// Build a client that sends metrics over UDP to the configured statsd sink.
///
/// Metrics are queued and sent from a background thread, so a slow or absent
/// sink never holds up a request.
fn init_metrics(settings: &Settings) -> Result<StatsdClient> {
    let socket = UdpSocket::bind("0.0.0.0:0").context("Binding metrics socket")?;
    socket
        .set_nonblocking(true)
        .context("Making metrics socket non-blocking")?;

    let sink_addr = (
        settings.metrics.sink_host.as_str(),
        settings.metrics.sink_port,
    );
    let udp_sink = BufferedUdpMetricSink::from(sink_addr, socket)
        .context("Connecting to metrics sink")?;
    let queuing_sink =
        QueuingMetricSink::with_capacity(udp_sink, settings.metrics.max_queue_size);

    Ok(StatsdClient::builder("roster", queuing_sink)
        .with_error_handler(|error| {
            tracing::warn!(r#type = "app.metrics.error", %error, "Could not send metric");
        })
        .build())
}
