//! Web handlers for the question answering API.

use crate::errors::{HandlerError, HandlerErrorKind};
use actix_web::{
    get,
    web::{self, Data, ServiceConfig},
    HttpResponse,
};
use cadence::{CountedExt, Histogrammed, StatsdClient};
use roster_answer::{Answer, Answerer};
use roster_settings::{AnswerSettings, Settings};
use serde::{Deserialize, Serialize};

/// Configure a route to use the Ask service.
pub fn configure(config: &mut ServiceConfig) {
    config
        .app_data(web::QueryConfig::default().error_handler(|error, _request| {
            HandlerError::from(HandlerErrorKind::MalformedQuery(error.to_string())).into()
        }))
        .service(ask);
}

/// Answer a question about members with the most similar upstream message.
///
/// Every outcome, including an unreachable upstream, is a successful response
/// with a single `answer` field.
#[get("")]
#[tracing::instrument(skip(query, answerer, metrics_client, settings))]
async fn ask(
    query: web::Query<AskQueryParameters>,
    answerer: Data<Answerer>,
    metrics_client: Data<StatsdClient>,
    settings: Data<Settings>,
) -> HttpResponse {
    safe_log_request(settings.log_full_request, &query.question);

    let answer = answerer.answer(&query.question).await;
    record_answer(&metrics_client, &answer);

    HttpResponse::Ok().json(AskResponse {
        answer: answer_text(&answer, &settings.answers),
    })
}

/// Query parameters
#[derive(Debug, Deserialize)]
struct AskQueryParameters {
    /// The free-text question to answer.
    question: String,
}

/// The response the API generates.
#[derive(Debug, Serialize)]
struct AskResponse<'a> {
    /// The best matching message, or an explanation of why there isn't one.
    answer: &'a str,
}

/// The text to answer with for an [`Answer`].
fn answer_text<'a>(answer: &'a Answer, answers: &'a AnswerSettings) -> &'a str {
    match answer {
        Answer::Found { message, .. } => message,
        Answer::NoMatch { .. } => &answers.no_match,
        Answer::FetchFailed => &answers.fetch_failed,
    }
}

/// Count the outcome of a question.
fn record_answer(metrics_client: &StatsdClient, answer: &Answer) {
    let outcome = match answer {
        Answer::Found { .. } => "ask.answered",
        Answer::NoMatch { .. } => "ask.no-match",
        Answer::FetchFailed => "ask.fetch-failed",
    };
    metrics_client.incr(outcome).ok();

    if !matches!(answer, Answer::FetchFailed) {
        metrics_client
            .histogram("ask.candidates", answer.candidates() as u64)
            .ok();
    }

    tracing::info!(
        r#type = "web.ask.answered",
        outcome,
        candidates = answer.candidates(),
        "Answered question"
    );
}

/// Log a question, respecting the `log_full_request` setting.
fn safe_log_request(log_question: bool, question: &str) {
    let question = if log_question { question } else { "" };

    tracing::info!(
        r#type = "web.ask.request",
        sensitive = true,
        %question,
        // Also includes fields from the root span, including `request_id` and
        // `http.path` (which does not include the query string).
        "handling question"
    );
}

#[cfg(test)]
mod tests {
    use super::answer_text;
    use roster_answer::Answer;
    use roster_settings::AnswerSettings;

    fn answers() -> AnswerSettings {
        AnswerSettings {
            fetch_failed: "Could not fetch data from the API.".to_string(),
            no_match: "I couldn't find a clear answer.".to_string(),
        }
    }

    #[test]
    fn test_answer_text() {
        let answers = answers();
        let found = Answer::Found {
            message: "Layla loves jazz".to_string(),
            candidates: 1,
        };

        assert_eq!(answer_text(&found, &answers), "Layla loves jazz");
        assert_eq!(
            answer_text(&Answer::NoMatch { candidates: 3 }, &answers),
            "I couldn't find a clear answer."
        );
        assert_eq!(
            answer_text(&Answer::FetchFailed, &answers),
            "Could not fetch data from the API."
        );
    }
}
