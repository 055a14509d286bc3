//! Tests that Roster logs behave as expected.
//!
//! This module should be used for general logging behavior. Logging behavior for
//! specific parts of Roster should be placed in more specific test modules.
#![cfg(test)]

use crate::{roster_test, TestingTools};
use anyhow::Result;
use tracing::Level;

#[actix_rt::test]
async fn startup_logs_the_message_source() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             upstream_mock,
             mut log_watcher,
             ..
         }| async move {
            let source = format!("UpstreamMessages({})", upstream_mock.url("/messages"));

            assert!(log_watcher.has(|event| {
                event.level == Level::INFO
                    && event.has_type("web.configured-source")
                    && event.field_contains("source", &source)
            }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn logs_are_structured() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             mut log_watcher, ..
         }| async move {
            assert!(log_watcher.events().count() > 0);
            assert!(log_watcher
                .events()
                .all(|event| !event.timestamp.is_empty() && !event.target.is_empty()));

            Ok(())
        },
    )
    .await
}
