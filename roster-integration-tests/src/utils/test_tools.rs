//! Tools for running tests

use crate::utils::{logging::LogWatcher, metrics::MetricsWatcher};
use httpmock::MockServer;
use reqwest::{redirect, Client, ClientBuilder, RequestBuilder};
use roster_settings::Settings;
use std::{future::Future, net::TcpListener};
use tracing_futures::{Instrument, WithSubscriber};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt};

/// The path the mock upstream serves messages on.
pub const UPSTREAM_PATH: &str = "/messages";

/// Run a test with a fully configured Roster server.
///
/// The server will listen on a port assigned arbitrarily by the OS, and is
/// configured to fetch messages from a mock upstream API that the test can add
/// responses to.
///
/// A suite of tools will be passed to the test function in the form of an
/// instance of [`TestingTools`]. It includes an HTTP client configured to use
/// the test server, the mock upstream server, a log collector, and a metrics
/// collector.
///
/// # Example
///
/// ```
/// # use roster_integration_tests::{roster_test, TestingTools};
/// #[actix_rt::test]
/// async fn a_test() {
///     roster_test(
///         |settings| settings.debug = false,
///         |TestingTools { test_client, mut log_watcher, .. }| async move {
///             assert!(true) // Test goes here
///         }
///     ).await
/// }
/// ```
///
/// # Panics
/// May panic if tests could not be set up correctly.
pub async fn roster_test<FSettings, FTest, Fut>(settings_changer: FSettings, test: FTest) -> Fut::Output
where
    FSettings: FnOnce(&mut Settings),
    FTest: Fn(TestingTools) -> Fut,
    Fut: Future,
{
    let test_span = tracing::info_span!("roster_test");

    // Load settings
    let mut settings = Settings::load_for_tests();

    // Set up logging
    let log_watcher = LogWatcher::default();
    let log_watcher_writer = log_watcher.make_writer();

    let env_filter: tracing_subscriber::EnvFilter = (&settings.logging.levels).into();
    let tracing_subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(move || log_watcher_writer.clone()),
        )
        .with(tracing_subscriber::fmt::layer().pretty().with_test_writer());

    let _tracing_subscriber_guard = tracing::subscriber::set_default(tracing_subscriber);

    // Set up a mock server for the upstream messages API. Tests add the
    // responses they need.
    let upstream_mock = MockServer::start_async().await;
    settings.upstream.url = upstream_mock.url(UPSTREAM_PATH);

    settings_changer(&mut settings);

    // Setup metrics
    assert_eq!(
        settings.metrics.sink_host, "0.0.0.0",
        "Tests cannot change the metrics sink host, since it is ignored"
    );
    assert_eq!(
        settings.metrics.sink_port, 8125,
        "Tests cannot change the metrics sink address, since it is ignored"
    );
    let (metrics_watcher, metrics_client) = MetricsWatcher::new_with_client();

    // Run server in the background
    let listener = TcpListener::bind(settings.http.listen).expect("Failed to bind to a port");
    let address = listener
        .local_addr()
        .expect("Listener has no local address")
        .to_string();
    let server =
        roster_web::run(listener, metrics_client, settings).expect("Failed to start server");
    let server_handle = actix_rt::spawn(server.with_current_subscriber());
    let test_client = TestReqwestClient::new(address);

    // Assemble the tools
    let tools = TestingTools {
        test_client,
        upstream_mock,
        log_watcher,
        metrics_watcher,
    };
    // Run the test
    let rv = test(tools).instrument(test_span).await;
    server_handle.abort();
    rv
}

/// A set of tools for tests, including mock servers and logging helpers.
///
/// The fields of this struct are marked as non-exhaustive, meaning that any
/// destructuring of this struct will require a `..` "and the rest" entry, even
/// if all present items are named. This makes adding tools in the future easier,
/// since old tests won't need to be rewritten to account for the added tools.
#[non_exhaustive]
pub struct TestingTools {
    /// A wrapper around a `reqwest::client` that automatically uses the Roster
    /// server under test.
    pub test_client: TestReqwestClient,

    /// A [`httpmock::MockServer`] that the server fetches messages from, at
    /// [`UPSTREAM_PATH`]. Does not contain mock responses, any needed must be
    /// added. Requests to a path with no mock get a `404`.
    pub upstream_mock: MockServer,

    /// To make assertions about logs.
    ///
    /// Only events emitted on the test's own thread are collected. The HTTP
    /// workers run on their own threads, so events from request handlers are
    /// not seen here.
    pub log_watcher: LogWatcher,

    /// To make assertions about metrics.
    pub metrics_watcher: MetricsWatcher,
}

/// A wrapper around a `[reqwest::client]` that automatically sends requests to
/// the test server.
///
/// This only handles `GET` requests right now. Other methods should be
/// added as needed.
///
/// The client is configured to not follow any redirects.
pub struct TestReqwestClient {
    /// The wrapped client.
    client: Client,

    /// The server address to implicitly use for all requests.
    address: String,
}

impl TestReqwestClient {
    /// Construct a new test client that uses `address` for every request given.
    pub fn new(address: String) -> Self {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Could not build test client");
        Self { client, address }
    }

    /// Start building a GET request to the test server with the path specified.
    ///
    /// The path should start with `/`, such as `/__heartbeat__`.
    pub fn get(&self, path: &str) -> RequestBuilder {
        assert!(path.starts_with('/'));
        let url = format!("http://{}{}", &self.address, path);
        self.client.get(url)
    }

    /// Ask the server under test a question, with the question properly
    /// escaped in the query string.
    pub fn ask(&self, question: &str) -> RequestBuilder {
        self.get("/ask").query(&[("question", question)])
    }
}
