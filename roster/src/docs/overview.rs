//! # High level overview of Roster
//!
//! This project is structured as a [Cargo Workspace][] that contains one crate
//! for each broad area of behavior for Roster. Each crate can be built and
//! tested on its own, or together with the rest of the workspace.
//!
//! [Cargo Workspace]: https://doc.rust-lang.org/book/ch14-03-cargo-workspaces.html
//!
//! ## [`roster`](../)
//!
//! The main application, and the only *binary* crate in the repository. It
//! loads settings, sets up logging, metrics and error reporting, and starts the
//! web server.
//!
//! ## [`roster-settings`](../../roster_settings/index.html)
//!
//! Defines and documents the settings of the application. Settings are loaded
//! by the binary and passed into the other crates to configure them.
//!
//! ## [`roster-web`](../../roster_web/index.html)
//!
//! The HTTP API, including the operational endpoints load balancers and
//! deployment tooling expect.
//!
//! ## [`roster-answer`](../../roster_answer/index.html)
//!
//! The *domain* crate. It fetches message records from the upstream API, guesses
//! which member a question is about, and picks the record most similar to the
//! question.
//!
//! ## [`roster-integration-tests`](../../roster_integration_tests/index.html)
//!
//! Tests that start the whole service against a mock upstream and talk to it
//! over HTTP.
