#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Web server for [Roster](../roster/index.html)'s public API.

mod dockerflow;
mod endpoints;
mod errors;
mod logging;
mod middleware;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    get,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use anyhow::{Context, Result};
use cadence::StatsdClient;
use roster_answer::{Answerer, UpstreamMessages};
use roster_settings::Settings;
use serde::Serialize;
use std::{net::TcpListener, sync::Arc};
use tracing_actix_web::TracingLogger;

use crate::logging::RosterRootSpanBuilder;

/// The name the service reports for itself.
const SERVICE_TITLE: &str = "Member Question Answering API";

/// What the service does, as reported by the root view.
const SERVICE_DESCRIPTION: &str =
    "Ask natural-language questions about members based on the public /messages API.";

/// Run the web server
///
/// The returned server is a `Future` that must either be `.await`ed, or run it
/// as a background task using `tokio::spawn`.
///
/// Most of the details from `settings` will be respected, except for those that
/// go into building the listener (the host and port). If you want to respect the
/// settings specified in that object, you must include them in the construction
/// of `listener`.
///
/// # Errors
///
/// Returns an error if the message source can't be set up, or if the server
/// cannot be started on the provided listener.
///
/// # Examples
///
/// Run the server in the foreground. This will only return if there is an error
/// that causes the server to shut down. This is used to run Roster as a service,
/// such as in production.
///
/// ```no_run
/// # actix_rt::System::new().block_on(async {
/// let listener = std::net::TcpListener::bind("127.0.0.1:8080")
///     .expect("Failed to bind port");
/// let settings = roster_settings::Settings::load()
///     .expect("Failed to load settings");
/// let metrics_client = cadence::StatsdClient::from_sink("roster", cadence::NopMetricSink);
/// roster_web::run(listener, metrics_client, settings)
///     .expect("Failed to start server")
///     .await
///     .expect("Fatal error while running server");
/// # })
/// ```
pub fn run(
    listener: TcpListener,
    metrics_client: StatsdClient,
    settings: Settings,
) -> Result<Server> {
    let num_workers = settings.http.workers;

    let source =
        UpstreamMessages::new(&settings.upstream).context("Setting up the message source")?;
    let answerer = Answerer::new(Arc::new(source));

    tracing::info!(
        r#type = "web.configured-source",
        source = %answerer.source_name(),
        "Answering questions from upstream messages"
    );

    let metrics_client = Data::new(metrics_client);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(settings.clone()))
            .app_data(Data::new(answerer.clone()))
            .app_data(metrics_client.clone())
            .wrap(middleware::Metrics)
            .wrap(Cors::permissive())
            .wrap(TracingLogger::<RosterRootSpanBuilder>::new())
            // The core functionality of Roster
            .service(web::scope("ask").configure(endpoints::ask::configure))
            .service(root_info)
            // Add the behavior necessary to satisfy Dockerflow.
            .service(web::scope("").configure(dockerflow::configure))
    })
    .listen(listener)?;

    if let Some(n) = num_workers {
        server = server.workers(n);
    }

    Ok(server.run())
}

/// The service's description of itself.
#[derive(Debug, Serialize)]
struct ServiceInfo {
    /// The name of the service.
    title: &'static str,
    /// What the service does.
    description: &'static str,
    /// The running version.
    version: &'static str,
}

/// The root view, to provide information about what this service is.
///
/// This is intended to be seen by people trying to investigate what this service
/// is. It should redirect to documentation, if it is available, or describe
/// the service otherwise.
#[get("/")]
async fn root_info(settings: Data<Settings>) -> HttpResponse {
    match &settings.public_documentation {
        Some(redirect_url) => HttpResponse::Found()
            .insert_header(("location", redirect_url.to_string()))
            .finish(),
        None => HttpResponse::Ok().json(ServiceInfo {
            title: SERVICE_TITLE,
            description: SERVICE_DESCRIPTION,
            version: env!("CARGO_PKG_VERSION"),
        }),
    }
}
