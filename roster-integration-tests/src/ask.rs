//! Tests Roster's ability to answer questions from the upstream messages.
#![cfg(test)]

use crate::{message_item, mock_messages, roster_test, TestingTools};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

const FETCH_FAILED: &str = "Could not fetch data from the API.";
const NO_MATCH: &str = "I couldn't find a clear answer.";

fn layla_and_vikram() -> Vec<Value> {
    vec![
        message_item("Layla Kareem", "Layla loves jazz"),
        message_item("Vikram Desai", "Vikram plays chess"),
    ]
}

#[actix_rt::test]
async fn ask_answers_with_the_most_similar_message() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let mock = mock_messages(&upstream_mock, layla_and_vikram()).await;

            let response = test_client.ask("What does Layla love?").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get("content-type").map(|v| v.as_bytes()),
                Some(&b"application/json"[..])
            );
            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": "Layla loves jazz" }));
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_fetches_upstream_once_per_question() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let mock = mock_messages(&upstream_mock, layla_and_vikram()).await;

            for _ in 0..3 {
                let response = test_client.ask("what does Layla love?").send().await?;
                assert_eq!(response.status(), StatusCode::OK);
            }

            mock.assert_hits_async(3).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_answers_when_nothing_is_similar() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(&upstream_mock, layla_and_vikram()).await;

            let response = test_client.ask("zzzz qqqq").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.text().await?, format!(r#"{{"answer":"{}"}}"#, NO_MATCH));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_with_an_empty_question_has_no_answer() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(&upstream_mock, layla_and_vikram()).await;

            let response = test_client.get("/ask?question=").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": NO_MATCH }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_ties_go_to_the_first_message() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(
                &upstream_mock,
                vec![
                    message_item("Omar Haddad", "Omar likes tea"),
                    message_item("Omid Rahimi", "Omid likes tea"),
                ],
            )
            .await;

            let response = test_client.ask("Who likes tea?").send().await?;

            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": "Omar likes tea" }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_skips_records_without_a_message() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(
                &upstream_mock,
                vec![
                    json!({ "user_name": "Layla Kareem", "timestamp": "2025-05-05T07:47:20+00:00" }),
                    json!({ "user_name": "Layla Kareem", "message": null }),
                    message_item("Layla Kareem", "  Layla loves jazz  "),
                ],
            )
            .await;

            let response = test_client.ask("what does Layla love?").send().await?;

            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": "Layla loves jazz" }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_null_messages_count_as_name_matches() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(
                &upstream_mock,
                vec![
                    json!({ "user_name": "Layla", "message": null }),
                    json!({ "message": "Vikram plays chess" }),
                ],
            )
            .await;

            let response = test_client.ask("does Layla play chess?").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": NO_MATCH }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_with_only_null_messages_has_no_answer() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            mock_messages(&upstream_mock, vec![json!({ "message": null })]).await;

            let response = test_client.ask("What does Layla love?").send().await?;

            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": NO_MATCH }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_reports_upstream_errors() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/messages");
                    then.status(500).body("Internal Server Error");
                })
                .await;

            let response = test_client.ask("What does Layla love?").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": FETCH_FAILED }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_reports_malformed_upstream_bodies() -> Result<()> {
    for bad_body in [
        "this is not json",
        "[1, 2, 3]",
        r#"{"total": 3}"#,
        r#"{"items": "nope"}"#,
        r#"{"total": 0, "items": []}"#,
    ] {
        roster_test(
            |_| (),
            |TestingTools {
                 test_client,
                 upstream_mock,
                 ..
             }| async move {
                upstream_mock
                    .mock_async(|when, then| {
                        when.method(GET).path("/messages");
                        then.status(200)
                            .header("content-type", "application/json")
                            .body(bad_body);
                    })
                    .await;

                let response = test_client.ask("What does Layla love?").send().await?;

                assert_eq!(response.status(), StatusCode::OK);
                let body: Value = response.json().await?;
                assert_eq!(body, json!({ "answer": FETCH_FAILED }), "body: {}", bad_body);

                Ok::<(), anyhow::Error>(())
            },
        )
        .await?;
    }

    Ok(())
}

#[actix_rt::test]
async fn ask_reports_slow_upstreams() -> Result<()> {
    roster_test(
        |settings| settings.upstream.timeout = Duration::from_millis(200),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/messages");
                    then.status(200)
                        .json_body(json!({ "total": 1, "items": [message_item("Layla Kareem", "Layla loves jazz")] }))
                        .delay(Duration::from_secs(2));
                })
                .await;

            let response = test_client.ask("What does Layla love?").send().await?;

            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": FETCH_FAILED }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_uses_configured_answers() -> Result<()> {
    roster_test(
        |settings| settings.answers.fetch_failed = "Try again later.".to_string(),
        |TestingTools { test_client, .. }| async move {
            // No mock is set up, so the upstream answers with a 404.
            let response = test_client.ask("What does Layla love?").send().await?;

            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "answer": "Try again later." }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_requires_a_question() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let mock = mock_messages(&upstream_mock, layla_and_vikram()).await;

            let response = test_client.get("/ask").send().await?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = response.json().await?;
            let error = body["error"].as_str().unwrap_or_default();
            assert!(error.starts_with("Malformed query"), "error: {}", error);
            assert!(error.contains("question"), "error: {}", error);
            mock.assert_hits_async(0).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_records_outcome_metrics() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             mut metrics_watcher,
             ..
         }| async move {
            mock_messages(&upstream_mock, layla_and_vikram()).await;

            test_client.ask("what does Layla love?").send().await?;
            assert!(metrics_watcher.has_incr("ask.answered"));
            assert!(metrics_watcher.has_histogram("ask.candidates", 1.0));

            test_client.ask("zzzz qqqq").send().await?;
            assert!(metrics_watcher.has_incr("ask.no-match"));
            assert!(metrics_watcher.has_histogram("ask.candidates", 2.0));

            assert!(!metrics_watcher.has_incr("ask.fetch-failed"));
            assert!(metrics_watcher.has_named("request.duration"));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn ask_counts_fetch_failures() -> Result<()> {
    roster_test(
        |_| (),
        |TestingTools {
             test_client,
             mut metrics_watcher,
             ..
         }| async move {
            test_client.ask("What does Layla love?").send().await?;

            assert!(metrics_watcher.has_incr("ask.fetch-failed"));
            assert!(!metrics_watcher.has_named("ask.candidates"));

            Ok(())
        },
    )
    .await
}
