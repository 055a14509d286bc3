//! Block-matching string similarity.
//!
//! The ratio here is the one computed by the classic "sequence matcher"
//! algorithm (Ratcliff/Obershelp with the popular-element heuristic): find the
//! longest matching block, recurse into the unmatched pieces on either side,
//! and report `2 * matched / total_length`. The acceptance threshold and name
//! bonus used by the matcher are tuned against these exact magnitudes, so
//! swapping in an edit distance or a token overlap score would change which
//! questions get answers.

use std::collections::HashMap;

/// Sequences at least this long have their most common elements excluded from
/// seeding matches.
const POPULAR_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Where the block starts in the first sequence.
    pub a_start: usize,
    /// Where the block starts in the second sequence.
    pub b_start: usize,
    /// The length of the block.
    pub size: usize,
}

/// Compares two sequences of characters.
#[derive(Debug)]
pub struct SequenceMatcher {
    /// The first sequence.
    a: Vec<char>,
    /// The second sequence.
    b: Vec<char>,
    /// For every element of `b` that isn't popular, the indices it appears at
    /// in ascending order.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Prepare to compare `a` against `b`. Characters are compared exactly, so
    /// callers wanting case-insensitivity must normalize first.
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Find the longest block of `a[alo..ahi]` that matches `b[blo..bhi]`.
    ///
    /// Among blocks of maximal size, the one that starts earliest in `a` wins,
    /// and of those, the one that starts earliest in `b`. The block found from
    /// the index is then extended over equal neighbours, which is how popular
    /// elements still end up inside matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] is the length of the match ending at a[i - 1] and b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks, in no particular order.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks
    }

    /// The similarity of the two sequences, from 0.0 to 1.0.
    ///
    /// Two empty sequences are identical and score 1.0.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|block| block.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Case-insensitive similarity of `a` and `b`, from 0.0 to 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(&a.to_lowercase(), &b.to_lowercase()).ratio()
}

#[cfg(test)]
mod tests {
    use super::{similarity, Block, SequenceMatcher};
    use parameterized::parameterized;
    use pretty_assertions::assert_eq;

    /// Float comparison with a tolerance well below any meaningful score step.
    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[parameterized(a = {
        "What does Layla love?", "What does Layla love?", "abcd", "hello world", "abc", "When is Vikram flying to Paris?"
    }, b = {
        "Layla loves jazz", "Vikram plays chess", "bcde", "hello there", "", "Layla loves jazz"
    }, expected = {
        20.0 / 37.0, 14.0 / 39.0, 0.75, 14.0 / 22.0, 0.0, 8.0 / 47.0
    })]
    fn test_known_ratios(a: &str, b: &str, expected: f64) {
        assert_close(similarity(a, b), expected);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        for (a, b) in [
            ("What does Layla love?", "Layla loves jazz"),
            ("hello world", "hello there"),
            ("xyz", "Layla loves jazz"),
        ] {
            assert_close(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_identical_strings_are_fully_similar() {
        assert_close(similarity("Book a table", "Book a table"), 1.0);
        assert_close(similarity("Book a table", "BOOK A TABLE"), 1.0);
        let long = "ab".repeat(150);
        assert_close(similarity(&long, &long), 1.0);
    }

    #[test]
    fn test_empty_strings() {
        assert_close(similarity("", ""), 1.0);
        assert_close(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_popular_characters_do_not_seed_matches() {
        // Every character of the long second string is popular, so there is
        // nothing to start a match from.
        assert_close(similarity(&"ab".repeat(150), &"ba".repeat(150)), 0.0);
    }

    #[test]
    fn test_long_messages_prune_popular_characters() {
        let question = "Can you book a table for two at the Italian place near my hotel?";
        let message = "Please book a table for four at the Italian restaurant near the Four \
            Seasons hotel on Friday evening, and make sure they know one guest is vegetarian \
            and another has a severe nut allergy, so the kitchen can plan ahead.";
        assert_eq!(message.chars().count(), 218);

        // Only the second sequence is pruned, so the order matters once it is
        // 200 characters or longer.
        assert_close(similarity(question, message), 7.0 / 141.0);
        assert_close(similarity(message, question), 49.0 / 141.0);
    }

    #[test]
    fn test_longest_match_prefers_earliest_block() {
        let matcher = SequenceMatcher::new(" abcd", "abcd abcd");
        assert_eq!(
            matcher.find_longest_match(0, 5, 0, 9),
            Block {
                a_start: 0,
                b_start: 4,
                size: 5
            }
        );
    }

    #[test]
    fn test_matching_blocks_cover_both_sides() {
        let matcher = SequenceMatcher::new("abxcd", "abcd");
        let mut blocks = matcher.matching_blocks();
        blocks.sort_by_key(|block| block.a_start);
        assert_eq!(
            blocks,
            vec![
                Block {
                    a_start: 0,
                    b_start: 0,
                    size: 2
                },
                Block {
                    a_start: 3,
                    b_start: 2,
                    size: 2
                },
            ]
        );
    }
}
