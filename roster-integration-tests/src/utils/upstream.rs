//! Canned responses for the mock upstream messages API.

use crate::utils::test_tools::UPSTREAM_PATH;
use httpmock::{Method::GET, Mock, MockServer};
use serde_json::{json, Value};

/// A message record shaped like the ones the upstream API returns.
pub fn message_item(user_name: &str, message: &str) -> Value {
    json!({
        "id": format!("{}-{}", user_name.to_lowercase().replace(' ', "-"), message.len()),
        "user_id": user_name.to_lowercase().replace(' ', "-"),
        "user_name": user_name,
        "timestamp": "2025-05-05T07:47:20.159073+00:00",
        "message": message,
    })
}

/// Serve `items` as the only page of the upstream messages API.
pub async fn mock_messages(server: &MockServer, items: Vec<Value>) -> Mock<'_> {
    let total = items.len();
    server
        .mock_async(|when, then| {
            when.method(GET).path(UPSTREAM_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "total": total, "items": items }));
        })
        .await
}
