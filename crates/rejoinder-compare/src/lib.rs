//! `rejoinder-compare` – statement similarity scoring.
//!
//! Every comparator maps a pair of statement texts to a score in `[0.0, 1.0]`
//! where higher means more similar, and returns `0.0` whenever either text is
//! empty.
//!
//! # Modules
//!
//! - [`levenshtein`] – [`LevenshteinDistance`]: character-level
//!   longest-matching-blocks ratio, rounded to two decimals.  Needs no
//!   linguistic resources.
//! - [`synset`] – [`SynsetDistance`]: maximum taxonomic path similarity
//!   between the content words of both statements, looked up in a
//!   [`Thesaurus`].
//! - [`jaccard`] – [`JaccardSimilarity`]: Jaccard index over the lemmatized
//!   content words of both statements.
//! - [`language`] – [`Language`]: stopword lists and the word tokenizer.
//! - [`thesaurus`] – [`Thesaurus`] and the [`Taxonomy`] hypernym graph.
//! - [`tagger`] / [`lemmatizer`] – part-of-speech tagging and lemmatization
//!   used by the Jaccard comparator.
//!
//! # Example
//!
//! ```rust
//! use rejoinder_compare::{Comparator, ComparatorKind, Language};
//!
//! let comparator = ComparatorKind::Jaccard.build(Language::English);
//! let score = comparator.compare("The young cat is hungry.", "The cat is very hungry.");
//! assert!((score - 0.5).abs() < 1e-9);
//! ```

pub mod jaccard;
pub mod language;
pub mod lemmatizer;
pub mod levenshtein;
pub mod synset;
pub mod tagger;
pub mod thesaurus;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jaccard::JaccardSimilarity;
pub use language::Language;
pub use lemmatizer::{Lemmatizer, RuleLemmatizer};
pub use levenshtein::LevenshteinDistance;
pub use synset::SynsetDistance;
pub use tagger::{PartOfSpeech, PosTagger, RuleTagger};
pub use thesaurus::{SenseDef, SenseId, Taxonomy, Thesaurus};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while loading linguistic resources.
///
/// Scoring itself never fails.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("failed to read resource: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed taxonomy: {0}")]
    Json(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Comparator
// ─────────────────────────────────────────────────────────────────────────────

/// A pluggable similarity-scoring strategy between two statement texts.
pub trait Comparator: Send + Sync {
    /// Score the similarity of `statement_a` and `statement_b` in `[0.0, 1.0]`.
    fn compare(&self, statement_a: &str, statement_b: &str) -> f64;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// Compile-time registry of the shipped comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorKind {
    #[default]
    Levenshtein,
    Synset,
    Jaccard,
}

impl ComparatorKind {
    /// Build the comparator with the built-in taxonomy.
    pub fn build(self, language: Language) -> Box<dyn Comparator> {
        self.build_with_taxonomy(language, Taxonomy::builtin())
    }

    /// Build the comparator, backing the thesaurus-driven variants with
    /// `taxonomy`.
    pub fn build_with_taxonomy(self, language: Language, taxonomy: Taxonomy) -> Box<dyn Comparator> {
        match self {
            ComparatorKind::Levenshtein => Box::new(LevenshteinDistance::new()),
            ComparatorKind::Synset => Box::new(SynsetDistance::with_thesaurus(
                language,
                Box::new(taxonomy),
            )),
            ComparatorKind::Jaccard => {
                let lemmatizer = RuleLemmatizer::from_taxonomy(&taxonomy);
                Box::new(JaccardSimilarity::with_components(
                    language,
                    Box::new(RuleTagger::new()),
                    Box::new(lemmatizer),
                ))
            }
        }
    }
}

impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorKind::Levenshtein => write!(f, "levenshtein"),
            ComparatorKind::Synset => write!(f, "synset"),
            ComparatorKind::Jaccard => write!(f, "jaccard"),
        }
    }
}

impl FromStr for ComparatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "levenshtein" | "lexical" => Ok(ComparatorKind::Levenshtein),
            "synset" | "thesaurus" => Ok(ComparatorKind::Synset),
            "jaccard" => Ok(ComparatorKind::Jaccard),
            other => Err(format!("unknown comparator '{other}'")),
        }
    }
}
