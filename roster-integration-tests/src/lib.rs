#![warn(missing_docs, clippy::missing_docs_in_private_items)]
// None of the tests are seen by the linter, so none of the utilities are marked
// as used. But docs don't generate for the below if they are `#[cfg(test)]`.
// This is a compromise.
#![allow(dead_code)]

//! Tests for Roster that work by reading from the external API only.
//!
//! Since the URL endpoints Roster exposes to the world are its public API, and
//! other systems depend on them, the paths and response bodies used in tests
//! here are important details, and used to keep compatibility.
//!
//! This is structured as a separate crate so that it produces a single test
//! binary instead of one test per file like would happen if this were
//! `roster/tests/...`. This improves compilation and test times.
//!
//! The primary tool used by tests is [`roster_test`], which creates a mock
//! upstream messages API, sets up the application for testing, and provides
//! helpers to inspect the state of the app. It then calls the test function
//! that is passed to it, providing the above tools as an argument.
//!
//! ```
//! use roster_integration_tests::{roster_test, TestingTools};
//! use reqwest::StatusCode;
//!
//! #[actix_rt::test]
//! async fn lbheartbeat_works() {
//!     roster_test(
//!         |_| (),
//!         |TestingTools { test_client, .. }| async move {
//!             let response = test_client
//!                 .get("/__lbheartbeat__")
//!                 .send()
//!                 .await
//!                 .expect("failed to execute request");
//!
//!             assert_eq!(response.status(), StatusCode::OK);
//!             assert_eq!(response.content_length(), Some(0));
//!         },
//!     )
//!     .await
//! }
//! ```

mod ask;
mod dockerflow;
mod general;
mod logging;
mod utils;

pub use crate::utils::{
    logging::{LogWatcher, TracingJsonEvent},
    metrics::MetricsWatcher,
    test_tools::{roster_test, TestReqwestClient, TestingTools},
    upstream::{message_item, mock_messages},
};
