//! The question answering pipeline.

use std::sync::Arc;

use crate::{
    fetch::MessageSource,
    matcher::{best_scored, narrow_to_name},
    name::extract_name,
    record::MessageRecord,
};

/// The outcome of answering a question.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    /// A record was similar enough to the question.
    Found {
        /// The record's message, trimmed.
        message: String,
        /// How many records were scored.
        candidates: usize,
    },

    /// Records were available, but none was similar enough.
    NoMatch {
        /// How many records were scored.
        candidates: usize,
    },

    /// The message source had no records to offer.
    FetchFailed,
}

impl Answer {
    /// How many records were scored to produce this answer.
    pub fn candidates(&self) -> usize {
        match self {
            Self::Found { candidates, .. } | Self::NoMatch { candidates } => *candidates,
            Self::FetchFailed => 0,
        }
    }
}

/// Answer `question` from an already fetched list of records.
///
/// An empty `records` means the fetch failed, since the upstream API is
/// never expected to be empty.
pub fn answer_from(question: &str, records: &[MessageRecord]) -> Answer {
    if records.is_empty() {
        return Answer::FetchFailed;
    }

    let name = extract_name(question);
    let candidates = narrow_to_name(records, name.as_deref());
    let candidate_count = candidates.len();

    tracing::debug!(
        r#type = "answer.candidates",
        name = name.as_deref(),
        fetched = records.len(),
        candidates = candidate_count,
        "Narrowed candidates"
    );

    match best_scored(question, candidates, name.as_deref()) {
        Some((record, score)) => {
            tracing::debug!(r#type = "answer.match", score, "Found a match");
            Answer::Found {
                message: record.message.trim().to_string(),
                candidates: candidate_count,
            }
        }
        None => Answer::NoMatch {
            candidates: candidate_count,
        },
    }
}

/// Answers questions from the records of a [`MessageSource`], fetching them
/// again for every question.
#[derive(Clone)]
pub struct Answerer {
    /// Where records come from.
    source: Arc<dyn MessageSource>,
}

impl Answerer {
    /// Answer questions from `source`.
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self { source }
    }

    /// The name of the underlying source.
    pub fn source_name(&self) -> String {
        self.source.name()
    }

    /// Fetch the current records and answer `question` from them.
    #[tracing::instrument(level = "debug", skip(self, question), fields(source = %self.source.name()))]
    pub async fn answer(&self, question: &str) -> Answer {
        let records = self.source.fetch_items().await;
        answer_from(question, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::{answer_from, Answer, Answerer};
    use crate::{MessageRecord, MessageSource};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// A source that always has the same records, and counts how often it is
    /// asked for them.
    struct StaticMessages {
        records: Vec<MessageRecord>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl MessageSource for StaticMessages {
        fn name(&self) -> String {
            "StaticMessages".to_string()
        }

        async fn fetch_items(&self) -> Vec<MessageRecord> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.records.clone()
        }
    }

    fn layla_and_vikram() -> Vec<MessageRecord> {
        vec![
            MessageRecord::new("Layla loves jazz"),
            MessageRecord::new("Vikram plays chess"),
        ]
    }

    #[test]
    fn test_nothing_fetched() {
        assert_eq!(answer_from("What does Layla love?", &[]), Answer::FetchFailed);
    }

    #[test]
    fn test_sentence_initial_word_falls_back_to_all_records() {
        assert_eq!(
            answer_from("What does Layla love?", &layla_and_vikram()),
            Answer::Found {
                message: "Layla loves jazz".to_string(),
                candidates: 2,
            }
        );
    }

    #[test]
    fn test_name_narrows_candidates() {
        assert_eq!(
            answer_from("what does Layla love?", &layla_and_vikram()),
            Answer::Found {
                message: "Layla loves jazz".to_string(),
                candidates: 1,
            }
        );
    }

    #[test]
    fn test_no_clear_answer() {
        assert_eq!(
            answer_from("zzzz qqqq", &layla_and_vikram()),
            Answer::NoMatch { candidates: 2 }
        );
    }

    #[test]
    fn test_answer_is_trimmed() {
        let records = vec![MessageRecord::new("  Layla loves jazz\n")];
        assert_eq!(
            answer_from("what does Layla love?", &records),
            Answer::Found {
                message: "Layla loves jazz".to_string(),
                candidates: 1,
            }
        );
    }

    #[test]
    fn test_only_empty_messages_is_not_a_fetch_failure() {
        let records = vec![MessageRecord::new("")];
        assert_eq!(
            answer_from("what does Layla love?", &records),
            Answer::NoMatch { candidates: 1 }
        );
    }

    #[test]
    fn test_empty_message_still_narrows_by_name() {
        let records = vec![
            MessageRecord::new("").with_user_name("Layla"),
            MessageRecord::new("Vikram plays chess"),
        ];
        assert_eq!(
            answer_from("does Layla play chess?", &records),
            Answer::NoMatch { candidates: 1 }
        );
    }

    #[tokio::test]
    async fn test_answerer_fetches_for_every_question() {
        let source = Arc::new(StaticMessages {
            records: layla_and_vikram(),
            fetches: AtomicUsize::new(0),
        });
        let answerer = Answerer::new(source.clone());

        let first = answerer.answer("what does Layla love?").await;
        let second = answerer.answer("zzzz qqqq").await;

        assert_eq!(first.candidates(), 1);
        assert_eq!(second, Answer::NoMatch { candidates: 2 });
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(answerer.source_name(), "StaticMessages");
    }
}
