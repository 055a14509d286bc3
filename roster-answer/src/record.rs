//! The message records served by the upstream API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnError, DefaultOnNull};

/// One message from the upstream API.
///
/// Only `message` is required. A record without it, or with a `message` that
/// is neither a string nor `null`, fails to deserialize and is dropped. A
/// `null` message reads as empty: the record still counts when narrowing by
/// name, but is never scored.
/// The optional fields fall back to `None` when they have an unexpected type,
/// and every other field the API sends is kept verbatim in `extra`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// The text of the message.
    #[serde_as(as = "DefaultOnNull")]
    pub message: String,

    /// The display name of the member who wrote the message.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// When the message was written, as sent by the API.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Any other fields of the record, such as `id` or `user_id`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageRecord {
    /// A record with only a message, mostly for tests and fixtures.
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            user_name: None,
            timestamp: None,
            extra: Map::new(),
        }
    }

    /// Set the author of the record.
    #[must_use]
    pub fn with_user_name<S: Into<String>>(mut self, user_name: S) -> Self {
        self.user_name = Some(user_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::MessageRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_record_parses() {
        let record: MessageRecord = serde_json::from_value(json!({
            "id": "b1e9bb83",
            "user_id": "cd3a350e",
            "user_name": "Sophia Al-Farsi",
            "timestamp": "2025-05-05T07:47:20.159073+00:00",
            "message": "Please book a private jet to Paris for this Friday.",
        }))
        .expect("record should parse");

        assert_eq!(record.user_name.as_deref(), Some("Sophia Al-Farsi"));
        assert_eq!(
            record.timestamp.as_deref(),
            Some("2025-05-05T07:47:20.159073+00:00")
        );
        assert_eq!(record.extra["id"], json!("b1e9bb83"));
        assert_eq!(record.extra["user_id"], json!("cd3a350e"));
    }

    #[test]
    fn test_message_is_required() {
        assert!(serde_json::from_value::<MessageRecord>(json!({"user_name": "Layla"})).is_err());
        assert!(serde_json::from_value::<MessageRecord>(json!({"message": 42})).is_err());
    }

    #[test]
    fn test_null_message_reads_as_empty() {
        let record: MessageRecord =
            serde_json::from_value(json!({"user_name": "Layla", "message": null}))
                .expect("record should parse");

        assert_eq!(record, MessageRecord::new("").with_user_name("Layla"));
    }

    #[test]
    fn test_mistyped_optional_fields_are_dropped() {
        let record: MessageRecord =
            serde_json::from_value(json!({"message": "hi", "user_name": 7, "timestamp": false}))
                .expect("record should parse");

        assert_eq!(record, MessageRecord::new("hi"));
    }
}
