//! Picking the record that best answers a question.

use crate::{record::MessageRecord, similarity::similarity};

/// Added to the score of a record whose author or text mentions the name found
/// in the question.
pub const NAME_BONUS: f64 = 0.10;

/// The lowest score a record can have and still be given as an answer.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.25;

/// Whether `record` was written by, or mentions, `name`. Case-insensitive.
pub fn mentions_name(record: &MessageRecord, name: &str) -> bool {
    let name = name.to_lowercase();
    record
        .user_name
        .as_deref()
        .map_or(false, |user_name| user_name.to_lowercase().contains(&name))
        || record.message.to_lowercase().contains(&name)
}

/// The records that mention `name`, or all of `records` if none do or there
/// is no name.
pub fn narrow_to_name<'a>(
    records: &'a [MessageRecord],
    name: Option<&str>,
) -> Vec<&'a MessageRecord> {
    if let Some(name) = name {
        let narrowed: Vec<_> = records
            .iter()
            .filter(|record| mentions_name(record, name))
            .collect();
        if !narrowed.is_empty() {
            return narrowed;
        }
    }
    records.iter().collect()
}

/// The best candidate for `question` along with its score, if it clears
/// [`ACCEPTANCE_THRESHOLD`].
///
/// Records with an empty message are skipped. A later record only replaces
/// the current best with a strictly higher score, so ties go to the record
/// seen first.
pub fn best_scored<'a, I>(
    question: &str,
    candidates: I,
    name: Option<&str>,
) -> Option<(&'a MessageRecord, f64)>
where
    I: IntoIterator<Item = &'a MessageRecord>,
{
    let question = question.trim();
    let mut best: Option<(&MessageRecord, f64)> = None;

    for record in candidates {
        if record.message.is_empty() {
            continue;
        }

        let mut score = similarity(question, &record.message);
        if name.map_or(false, |name| mentions_name(record, name)) {
            score += NAME_BONUS;
        }

        tracing::trace!(r#type = "answer.matcher.score", score, "Scored candidate");

        if score > best.map_or(0.0, |(_, best_score)| best_score) {
            best = Some((record, score));
        }
    }

    best.filter(|(_, score)| *score >= ACCEPTANCE_THRESHOLD)
}

/// The record that best answers `question`, if any is good enough.
pub fn best_match<'a, I>(
    question: &str,
    candidates: I,
    name: Option<&str>,
) -> Option<&'a MessageRecord>
where
    I: IntoIterator<Item = &'a MessageRecord>,
{
    best_scored(question, candidates, name).map(|(record, _)| record)
}

#[cfg(test)]
mod tests {
    use super::{best_match, best_scored, mentions_name, narrow_to_name};
    use crate::MessageRecord;
    use pretty_assertions::assert_eq;

    fn layla_and_vikram() -> Vec<MessageRecord> {
        vec![
            MessageRecord::new("Layla loves jazz"),
            MessageRecord::new("Vikram plays chess"),
        ]
    }

    #[test]
    fn test_mentions_name_checks_author_and_message() {
        let record = MessageRecord::new("Book a table for two").with_user_name("Amira Khan");
        assert!(mentions_name(&record, "amira"));
        assert!(mentions_name(&record, "TABLE"));
        assert!(!mentions_name(&record, "Layla"));
        assert!(!mentions_name(&MessageRecord::new("hello"), "Layla"));
    }

    #[test]
    fn test_narrowing_keeps_mentions() {
        let records = layla_and_vikram();
        assert_eq!(narrow_to_name(&records, Some("Layla")), vec![&records[0]]);
    }

    #[test]
    fn test_narrowing_falls_back_to_everything() {
        let records = layla_and_vikram();
        assert_eq!(narrow_to_name(&records, Some("What")).len(), 2);
        assert_eq!(narrow_to_name(&records, None).len(), 2);
    }

    #[test]
    fn test_most_similar_record_wins() {
        let records = layla_and_vikram();
        assert_eq!(
            best_match("What does Layla love?", &records, None),
            Some(&records[0])
        );
    }

    #[test]
    fn test_name_bonus_can_change_the_winner() {
        let records = vec![
            MessageRecord::new("I am staying in Rome").with_user_name("Amira"),
            MessageRecord::new("where is the car").with_user_name("Bob"),
        ];
        let question = "where is Amira staying";

        assert_eq!(best_match(question, &records, None), Some(&records[1]));
        let (winner, score) =
            best_scored(question, &records, Some("Amira")).expect("should find a match");
        assert_eq!(winner, &records[0]);
        assert!((score - (24.0 / 42.0 + 0.10)).abs() < 1e-9);
    }

    #[test]
    fn test_ties_go_to_the_first_record() {
        let records = vec![
            MessageRecord::new("Layla loves jazz").with_user_name("first"),
            MessageRecord::new("Layla loves jazz").with_user_name("second"),
        ];
        let winner = best_match("What does Layla love?", &records, None).unwrap();
        assert_eq!(winner.user_name.as_deref(), Some("first"));
    }

    #[test]
    fn test_scores_below_threshold_are_rejected() {
        let records = layla_and_vikram();
        assert_eq!(best_match("zzzz qqqq", &records, None), None);
    }

    #[test]
    fn test_empty_messages_are_never_chosen() {
        let records = vec![MessageRecord::new("").with_user_name("Layla")];
        assert_eq!(best_match("", &records, Some("Layla")), None);
    }

    #[test]
    fn test_question_is_trimmed_before_scoring() {
        let records = vec![MessageRecord::new("hello")];
        let (_, score) = best_scored("  hello \n", &records, None).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }
}
