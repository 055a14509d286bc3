//! Fetching message records from the upstream API.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use roster_settings::UpstreamSettings;
use serde::{de, Deserialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};
use thiserror::Error;

use crate::{record::MessageRecord, SetupError};

/// A source of the message records that questions are answered from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// An identifier for this source, used in logs.
    fn name(&self) -> String;

    /// Fetch the current records.
    ///
    /// Sources never fail outright: anything that goes wrong is logged and
    /// reported as an empty list.
    async fn fetch_items(&self) -> Vec<MessageRecord>;
}

/// Ways that fetching from the upstream API can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent, or timed out.
    #[error("Couldn't reach the messages API: {0}")]
    Network(#[source] reqwest::Error),

    /// The API answered with a 4xx or 5xx status.
    #[error("The messages API returned an error status: {0}")]
    Status(#[source] reqwest::Error),

    /// The body could not be read, or was not JSON.
    #[error("Failed to read the messages API response: {0}")]
    Body(#[source] reqwest::Error),

    /// The body was JSON, but not an object with an `items` list.
    #[error("The messages API response had an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// One page of the upstream API's response. Items are validated one by one,
/// so that a bad record doesn't discard the whole page.
#[serde_as]
#[derive(Debug, Deserialize)]
struct MessagesPage {
    /// The total number of messages the API has, across all pages.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    total: Option<u64>,
    /// The records on this page.
    items: Vec<Value>,
}

/// Fetches the first page of messages from an HTTP API.
pub struct UpstreamMessages {
    /// The HTTP client used for every request.
    client: reqwest::Client,
    /// The URL of the messages API.
    url: Url,
}

impl UpstreamMessages {
    /// Create an upstream source from settings.
    ///
    /// # Errors
    /// If the URL is not a valid absolute URL, or if the HTTP client can't be
    /// built.
    pub fn new(settings: &UpstreamSettings) -> Result<Self, SetupError> {
        let url = Url::parse(&settings.url)
            .with_context(|| format!("Invalid upstream URL {:?}", settings.url))
            .map_err(SetupError::InvalidConfiguration)?;
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(&settings.user_agent)
            .build()
            .context("Unable to create the Reqwest client")
            .map_err(SetupError::Network)?;

        Ok(Self { client, url })
    }

    /// Fetch the first page of records, reporting what went wrong if it fails.
    ///
    /// # Errors
    /// If the API is unreachable, answers with an error status, or sends a
    /// body that isn't an object with an `items` list.
    pub async fn try_fetch(&self) -> Result<Vec<MessageRecord>, FetchError> {
        let body: Value = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Status)?
            .json()
            .await
            .map_err(FetchError::Body)?;

        records_from_page(body)
    }
}

#[async_trait]
impl MessageSource for UpstreamMessages {
    fn name(&self) -> String {
        format!("UpstreamMessages({})", self.url)
    }

    async fn fetch_items(&self) -> Vec<MessageRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(
                    r#type = "answer.fetch.error",
                    %error,
                    url = %self.url,
                    "Error fetching messages"
                );
                Vec::new()
            }
        }
    }
}

/// Pull the valid records out of a page of the upstream API's response.
fn records_from_page(body: Value) -> Result<Vec<MessageRecord>, FetchError> {
    if !body.is_object() {
        return Err(FetchError::Shape(de::Error::custom("expected a JSON object")));
    }
    let page: MessagesPage = serde_json::from_value(body).map_err(FetchError::Shape)?;
    let received = page.items.len();

    let records: Vec<MessageRecord> = page
        .items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::debug!(r#type = "answer.fetch.invalid-item", %error, "Skipping item");
                None
            }
        })
        .collect();

    tracing::debug!(
        r#type = "answer.fetch.page",
        total = ?page.total,
        received,
        valid = records.len(),
        "Fetched messages"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{records_from_page, FetchError, MessageSource, UpstreamMessages};
    use crate::{MessageRecord, SetupError};
    use httpmock::{Method::GET, MockServer};
    use pretty_assertions::assert_eq;
    use roster_settings::UpstreamSettings;
    use serde_json::json;
    use std::time::Duration;

    fn settings_for(server: &MockServer, timeout: Duration) -> UpstreamSettings {
        UpstreamSettings {
            url: server.url("/messages"),
            timeout,
            user_agent: "roster-tests".to_string(),
        }
    }

    #[test]
    fn test_invalid_items_are_dropped() {
        let records = records_from_page(json!({
            "total": 4,
            "items": [
                {"message": "Layla loves jazz", "user_name": "Layla Kawaguchi"},
                {"user_name": "No Message"},
                "not an object",
                {"message": "Vikram plays chess"},
            ]
        }))
        .expect("page should parse");

        assert_eq!(
            records,
            vec![
                MessageRecord::new("Layla loves jazz").with_user_name("Layla Kawaguchi"),
                MessageRecord::new("Vikram plays chess"),
            ]
        );
    }

    #[test]
    fn test_null_message_is_kept() {
        let records = records_from_page(json!({
            "total": 2,
            "items": [
                {"user_name": "Layla", "message": null},
                {"message": "Vikram plays chess"},
            ]
        }))
        .expect("page should parse");

        assert_eq!(
            records,
            vec![
                MessageRecord::new("").with_user_name("Layla"),
                MessageRecord::new("Vikram plays chess"),
            ]
        );
    }

    #[test]
    fn test_page_shape_is_checked() {
        for body in [
            json!([{"message": "hi"}]),
            json!([1, [{"message": "hi"}]]),
            json!({"total": 1}),
            json!({"items": {"message": "hi"}}),
            json!("items"),
        ] {
            assert!(matches!(
                records_from_page(body),
                Err(FetchError::Shape(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_fetches_first_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/messages");
                then.status(200).json_body(json!({
                    "total": 2,
                    "items": [{"message": "Layla loves jazz"}, {"message": "Vikram plays chess"}],
                }));
            })
            .await;

        let source = UpstreamMessages::new(&settings_for(&server, Duration::from_secs(5)))
            .expect("source should build");
        let records = source.fetch_items().await;

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "Vikram plays chess");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/messages");
                then.status(500).body("oops");
            })
            .await;

        let source = UpstreamMessages::new(&settings_for(&server, Duration::from_secs(5)))
            .expect("source should build");

        assert!(matches!(source.try_fetch().await, Err(FetchError::Status(_))));
        assert_eq!(source.fetch_items().await, vec![]);
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/messages");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("{\"items\": [");
            })
            .await;

        let source = UpstreamMessages::new(&settings_for(&server, Duration::from_secs(5)))
            .expect("source should build");

        assert!(matches!(source.try_fetch().await, Err(FetchError::Body(_))));
        assert_eq!(source.fetch_items().await, vec![]);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/messages");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"items": [{"message": "too late"}]}));
            })
            .await;

        let source = UpstreamMessages::new(&settings_for(&server, Duration::from_millis(50)))
            .expect("source should build");

        assert_eq!(source.fetch_items().await, vec![]);
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let result = UpstreamMessages::new(&UpstreamSettings {
            url: "/messages".to_string(),
            timeout: Duration::from_secs(1),
            user_agent: "roster-tests".to_string(),
        });

        assert!(matches!(result, Err(SetupError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_empty() {
        let source = UpstreamMessages::new(&UpstreamSettings {
            url: "http://127.0.0.1:1/messages".to_string(),
            timeout: Duration::from_secs(1),
            user_agent: "roster-tests".to_string(),
        })
        .expect("source should build");

        assert!(matches!(source.try_fetch().await, Err(FetchError::Network(_))));
    }
}
