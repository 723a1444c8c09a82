//! Jaccard-index similarity over lemmatized content words.
//!
//! ```text
//! "The young cat is hungry."  →  {young, cat, hungry}
//! "The cat is very hungry."   →  {cat, very, hungry}
//!
//! |A ∩ B| / |A ∪ B| = 2 / 4 = 0.5
//! ```
//!
//! Punctuation is stripped before tokenizing, tokens are tagged with their
//! part of speech, stopwords are dropped, and every remaining token is
//! lemmatized with its tag.  Two statements without any content word score
//! `0.0` instead of dividing by zero.

use std::collections::{BTreeSet, HashSet};

use crate::Comparator;
use crate::language::{Language, strip_punctuation};
use crate::lemmatizer::{Lemmatizer, RuleLemmatizer};
use crate::tagger::{PosTagger, RuleTagger};
use crate::thesaurus::Taxonomy;

pub struct JaccardSimilarity {
    language: Language,
    stopwords: HashSet<&'static str>,
    tagger: Box<dyn PosTagger>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl JaccardSimilarity {
    /// Comparator using [`RuleTagger`] and a [`RuleLemmatizer`] seeded with
    /// the built-in taxonomy's vocabulary.
    pub fn new(language: Language) -> Self {
        Self::with_components(
            language,
            Box::new(RuleTagger::new()),
            Box::new(RuleLemmatizer::from_taxonomy(&Taxonomy::builtin())),
        )
    }

    pub fn with_components(
        language: Language,
        tagger: Box<dyn PosTagger>,
        lemmatizer: Box<dyn Lemmatizer>,
    ) -> Self {
        Self {
            language,
            stopwords: language.stopword_set(),
            tagger,
            lemmatizer,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// The set of lemmas `text` contributes to the index.
    pub fn lemmas(&self, text: &str) -> BTreeSet<String> {
        let cleaned = strip_punctuation(&text.to_lowercase());
        let tokens = self.language.tokenize(&cleaned);
        self.tagger
            .tag(&tokens)
            .into_iter()
            .filter(|(token, _)| !self.stopwords.contains(token.as_str()))
            .map(|(token, pos)| self.lemmatizer.lemmatize(&token, pos))
            .collect()
    }
}

impl Comparator for JaccardSimilarity {
    fn compare(&self, statement_a: &str, statement_b: &str) -> f64 {
        if statement_a.is_empty() || statement_b.is_empty() {
            return 0.0;
        }
        let a = self.lemmas(statement_a);
        let b = self.lemmas(statement_b);

        let union = a.union(&b).count();
        if union == 0 {
            return 0.0;
        }
        a.intersection(&b).count() as f64 / union as f64
    }

    fn name(&self) -> &'static str {
        "jaccard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::PartOfSpeech;

    fn comparator() -> JaccardSimilarity {
        JaccardSimilarity::new(Language::English)
    }

    #[test]
    fn canonical_cat_example_is_one_half() {
        let c = comparator();
        assert_eq!(
            c.lemmas("The young cat is hungry."),
            BTreeSet::from(["cat".to_string(), "hungry".to_string(), "young".to_string()])
        );
        assert_eq!(c.compare("The young cat is hungry.", "The cat is very hungry."), 0.5);
    }

    #[test]
    fn identical_statements_score_one() {
        assert_eq!(comparator().compare("Where is the post office?", "where is the post office"), 1.0);
    }

    #[test]
    fn inflections_collapse_to_the_same_lemma() {
        assert_eq!(comparator().compare("I like cats", "I liked the cat"), 1.0);
    }

    #[test]
    fn all_stopwords_on_both_sides_scores_zero() {
        assert_eq!(comparator().compare("how are you", "are you there"), 0.0);
    }

    #[test]
    fn disjoint_content_scores_zero() {
        assert_eq!(comparator().compare("hungry cat", "red car"), 0.0);
    }

    struct UpperLemmatizer;

    impl Lemmatizer for UpperLemmatizer {
        fn lemmatize(&self, word: &str, _pos: PartOfSpeech) -> String {
            word.to_uppercase()
        }
    }

    #[test]
    fn custom_components_are_used() {
        let c = JaccardSimilarity::with_components(
            Language::English,
            Box::new(RuleTagger::new()),
            Box::new(UpperLemmatizer),
        );
        assert!(c.lemmas("hungry cat").contains("CAT"));
    }
}
