//! # Testing strategies
//!
//! There are two major testing strategies used in this repository: unit tests,
//! and integration tests.
//!
//! Unit tests should appear close to the code they are testing, using standard
//! Rust unit tests. This is suitable for testing complex behavior at a small
//! scale, with fine grained control over the inputs, like the similarity ratio
//! and the matcher in `roster-answer`.
//!
//! Behavior that is only visible through HTTP, like the URLs and response
//! shapes the service exposes, is tested in
//! [`roster-integration-tests`][test-crate]. It starts an instance of Roster
//! with a mock upstream API, then makes HTTP requests to it.
//!
//! [test-crate]: ../../../roster_integration_tests/
//!
//! ```ignore
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
//!
//! Run everything with `cargo test --workspace`.
