//! Guessing which member a question is about.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One capitalized word, optionally followed by a second one.
    static ref NAME_PATTERN: Regex =
        Regex::new(r"\b([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)\b").expect("name pattern is valid");
}

/// Extract the first run of one or two capitalized words from `question`.
///
/// This is a capitalization heuristic, not a proper-noun recognizer. A
/// question that starts with a capital letter yields its first word ("What"),
/// and any other capitalized word is as likely to be picked as a name.
pub fn extract_name(question: &str) -> Option<String> {
    NAME_PATTERN
        .captures(question)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::extract_name;
    use parameterized::parameterized;

    #[parameterized(question = {
        "what does Layla love?",
        "when is Vikram Desai travelling",
        "is Amira Khan Here",
        "What does Layla love?",
    }, expected = {
        "Layla",
        "Vikram Desai",
        "Amira Khan",
        "What",
    })]
    fn test_first_capitalized_run(question: &str, expected: &str) {
        assert_eq!(extract_name(question).as_deref(), Some(expected));
    }

    #[parameterized(question = {
        "tell me about vikram desai",
        "who booked the jet?",
        "McDonald",
        "",
    })]
    fn test_no_name(question: &str) {
        assert_eq!(extract_name(question), None);
    }
}
