#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Question answering over member messages for [Roster](../roster/index.html).
//!
//! Answering a question takes four steps:
//!
//! 1. A [`MessageSource`] fetches the current page of [`MessageRecord`]s.
//! 2. [`extract_name`] guesses a proper name from the question.
//! 3. [`narrow_to_name`] keeps only the records mentioning that name, if any do.
//! 4. [`best_match`] scores the candidates with [`similarity`] plus a bonus
//!    for records that mention the name, and keeps the best one if it clears
//!    [`ACCEPTANCE_THRESHOLD`].
//!
//! [`Answerer`] ties the steps together and reports an [`Answer`].

mod answer;
mod fetch;
mod matcher;
mod name;
mod record;
mod similarity;

pub use crate::answer::{answer_from, Answer, Answerer};
pub use crate::fetch::{FetchError, MessageSource, UpstreamMessages};
pub use crate::matcher::{
    best_match, best_scored, mentions_name, narrow_to_name, ACCEPTANCE_THRESHOLD, NAME_BONUS,
};
pub use crate::name::extract_name;
pub use crate::record::MessageRecord;
pub use crate::similarity::{similarity, SequenceMatcher};

use thiserror::Error;

/// Errors that may occur while setting up the answer pipeline.
#[derive(Debug, Error)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub enum SetupError {
    #[error("The message source cannot be used with the current Roster configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    #[error("There was a network error while setting up the message source")]
    Network(#[source] anyhow::Error),
}
