//! Thesaurus-based similarity.
//!
//! Both statements are lowercased, tokenized and stripped of stopwords.  For
//! every pair of remaining words, every pair of their senses is scored with
//! [`Thesaurus::path_similarity`] and the overall maximum is kept.  Identical
//! words count as the same node even when the thesaurus does not know them.
//!
//! The maximum is then divided by
//!
//! ```text
//! max_possible = min(|A|, |B|) / max(|A|, |B|)
//! ```
//!
//! and clamped to `1.0`.  Either side having no content words scores `0.0`.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::Comparator;
use crate::language::Language;
use crate::thesaurus::{Taxonomy, Thesaurus};

pub struct SynsetDistance {
    language: Language,
    stopwords: HashSet<&'static str>,
    thesaurus: Box<dyn Thesaurus>,
}

impl SynsetDistance {
    /// Comparator backed by the built-in [`Taxonomy`].
    pub fn new(language: Language) -> Self {
        Self::with_thesaurus(language, Box::new(Taxonomy::builtin()))
    }

    pub fn with_thesaurus(language: Language, thesaurus: Box<dyn Thesaurus>) -> Self {
        Self {
            language,
            stopwords: language.stopword_set(),
            thesaurus,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn content_words(&self, text: &str) -> BTreeSet<String> {
        self.language
            .tokenize(&text.to_lowercase())
            .into_iter()
            .filter(|t| !self.stopwords.contains(t.as_str()))
            .collect()
    }

    fn word_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let senses_b = self.thesaurus.senses(b);
        if senses_b.is_empty() {
            return 0.0;
        }
        let mut best = 0.0f64;
        for sa in self.thesaurus.senses(a) {
            for &sb in &senses_b {
                if let Some(sim) = self.thesaurus.path_similarity(sa, sb) {
                    best = best.max(sim);
                }
            }
        }
        best
    }
}

impl Comparator for SynsetDistance {
    fn compare(&self, statement_a: &str, statement_b: &str) -> f64 {
        if statement_a.is_empty() || statement_b.is_empty() {
            return 0.0;
        }
        let tokens_a = self.content_words(statement_a);
        let tokens_b = self.content_words(statement_b);

        let shorter = tokens_a.len().min(tokens_b.len());
        let longer = tokens_a.len().max(tokens_b.len());
        if shorter == 0 {
            return 0.0;
        }
        let max_possible = shorter as f64 / longer as f64;

        let mut max_similarity = 0.0f64;
        for a in &tokens_a {
            for b in &tokens_b {
                max_similarity = max_similarity.max(self.word_similarity(a, b));
            }
        }
        trace!(max_similarity, max_possible, "synset comparison");

        (max_similarity / max_possible).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "synset"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: &str, b: &str) -> f64 {
        SynsetDistance::new(Language::English).compare(a, b)
    }

    #[test]
    fn identical_statements_score_one() {
        assert_eq!(score("I like cats", "I like cats"), 1.0);
    }

    #[test]
    fn unknown_identical_words_still_match() {
        assert_eq!(score("xylophone", "Xylophone!"), 1.0);
    }

    #[test]
    fn synonyms_score_one() {
        assert_eq!(score("Hello", "hey"), 1.0);
    }

    #[test]
    fn related_words_score_by_path() {
        // cat ↔ dog meet at carnivore, four edges apart
        let s = score("cat", "dog");
        assert!((s - 0.2).abs() < 1e-9, "{s}");
    }

    #[test]
    fn unrelated_words_score_zero() {
        assert_eq!(score("hungry", "computer"), 0.0);
    }

    #[test]
    fn all_stopword_statement_scores_zero() {
        assert_eq!(score("how are you", "how are you"), 0.0);
        assert_eq!(score("it is what it is", "cat"), 0.0);
    }

    #[test]
    fn unequal_lengths_are_clamped_to_one() {
        // max similarity 1.0 over max_possible 1/3 would exceed the range
        assert_eq!(score("cat", "cat dog bird"), 1.0);
    }

    #[test]
    fn unequal_lengths_scale_partial_matches() {
        // {cat, computer} vs {dog}: best pair cat↔dog = 0.2, max_possible = 0.5
        let s = score("cat computer", "dog");
        assert!((s - 0.4).abs() < 1e-9, "{s}");
    }

    #[test]
    fn custom_thesaurus_is_used() {
        let taxonomy = Taxonomy::from_json_str(
            r#"[{"id":"root"},{"id":"x","hypernyms":["root"],"lemmas":["foo"]},
                {"id":"y","hypernyms":["root"],"lemmas":["bar"]}]"#,
        )
        .unwrap();
        let c = SynsetDistance::with_thesaurus(Language::English, Box::new(taxonomy));
        assert!((c.compare("foo", "bar") - 1.0 / 3.0).abs() < 1e-9);
    }
}
