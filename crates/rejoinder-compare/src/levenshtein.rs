//! Lexical similarity via longest matching blocks.
//!
//! The ratio is `2·M / T` where `T` is the combined character count of both
//! strings and `M` the number of characters covered by matching blocks.
//! Blocks are found by repeatedly taking the longest common run (earliest in
//! the first string, then earliest in the second) and recursing on the
//! unmatched pieces to either side of it.
//!
//! When the second string has 200 characters or more, characters that make
//! up more than 1% of it are too common to seed a match.  They can still be
//! absorbed when a match is extended.
//!
//! ```text
//! "where is the post office?"  vs  "looking for the post office"  →  0.65
//! ```

use std::collections::HashMap;

use crate::Comparator;

/// Length from which the popular-character heuristic applies.
const POPULAR_MIN_LEN: usize = 200;

/// Lowercased, rounded longest-matching-blocks ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinDistance;

impl LevenshteinDistance {
    pub fn new() -> Self {
        Self
    }
}

impl Comparator for LevenshteinDistance {
    fn compare(&self, statement_a: &str, statement_b: &str) -> f64 {
        if statement_a.is_empty() || statement_b.is_empty() {
            return 0.0;
        }
        let a = statement_a.to_lowercase();
        let b = statement_b.to_lowercase();
        round2(sequence_ratio(&a, &b))
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Unrounded matching-blocks ratio of `a` and `b`, case-sensitive.
///
/// Two empty strings are identical and score `1.0`.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched_chars();
    2.0 * matched as f64 / total as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ─────────────────────────────────────────────────────────────────────────────
// BlockMatcher
// ─────────────────────────────────────────────────────────────────────────────

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of every non-popular character of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Returns `(i, j, size)`; ties resolve to the smallest `i`, then the
    /// smallest `j`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        // Length of the run ending at (i - 1, j), keyed by j.
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_lengths = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_lengths.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_lengths = next_lengths;
        }

        // Popular characters never seed a run; absorb them at both ends.
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

        (best_i, best_j, best_size)
    }

    /// Total characters covered by the matching blocks of `a` and `b`.
    fn matched_chars(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: &str, b: &str) -> f64 {
        LevenshteinDistance::new().compare(a, b)
    }

    #[test]
    fn post_office_example() {
        assert_eq!(score("where is the post office?", "looking for the post office"), 0.65);
    }

    #[test]
    fn known_ratios() {
        assert_eq!(score("hello", "hallo"), 0.8);
        assert_eq!(score("Hi there", "hi there!"), 0.94);
        assert_eq!(score("how are you", "how old are you"), 0.85);
        assert_eq!(score("Hello", "Hey"), 0.5);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(score("abc", "xyz"), 0.0);
    }

    #[test]
    fn identical_ignoring_case_scores_one() {
        assert_eq!(score("Good Morning", "good morning"), 1.0);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(score("", "anything"), 0.0);
        assert_eq!(score("anything", ""), 0.0);
        assert_eq!(score("", ""), 0.0);
    }

    #[test]
    fn raw_ratio_of_two_empty_strings_is_one() {
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn popular_characters_do_not_seed_matches() {
        let a = "ab".repeat(150);
        let b = format!("{}{}", "ba".repeat(120), "xyz".repeat(20));
        assert_eq!(sequence_ratio(&a, &b), 0.0);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let a: Vec<char> = "abxab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        let m = BlockMatcher::new(&a, &b);
        assert_eq!(m.longest_match(0, a.len(), 0, b.len()), (0, 0, 2));
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(sequence_ratio("café", "cafe"), 0.75);
    }
}
