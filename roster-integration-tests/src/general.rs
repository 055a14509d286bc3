//! Tests of the service's general behavior, such as its root view.
#![cfg(test)]

use crate::{roster_test, TestingTools};
use anyhow::Result;
use pretty_assertions::assert_eq;
use reqwest::{header::HeaderValue, StatusCode};
use serde_json::{json, Value};

#[actix_rt::test]
async fn root_of_services_provides_public_docs() -> Result<()> {
    roster_test(
        |settings| settings.public_documentation = Some("https://example.com/".parse().unwrap()),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/").send().await?;

            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(
                response.headers().get("location"),
                Some(&HeaderValue::from_static("https://example.com/"))
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn root_of_services_describes_itself() -> Result<()> {
    roster_test(
        |settings| settings.public_documentation = None,
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({
                    "title": "Member Question Answering API",
                    "description": "Ask natural-language questions about members based on the public /messages API.",
                    "version": env!("CARGO_PKG_VERSION"),
                })
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unknown_paths_are_not_found() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/api/v1/suggest?q=apple").send().await?;

            assert_eq!(response.status(), StatusCode::NOT_FOUND);

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn cors_allows_any_origin() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client
                .get("/__lbheartbeat__")
                .header("origin", "https://members.example.com")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get("access-control-allow-origin"),
                Some(&HeaderValue::from_static("https://members.example.com"))
            );

            Ok(())
        },
    )
    .await
}
