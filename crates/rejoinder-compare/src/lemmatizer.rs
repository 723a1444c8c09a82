//! Lemmatization.
//!
//! [`RuleLemmatizer`] resolves a word in three steps:
//!
//! 1. irregular forms come from an exception table (`went → go`);
//! 2. detachment rules for the word's part of speech produce candidates
//!    (`-ies → -y`, `-ed → -e`, `-ed → ∅`, …) and the first candidate found
//!    in the lexicon wins;
//! 3. otherwise a conservative suffix-stripping fallback applies.
//!
//! A word already present in the lexicon is its own lemma.

use std::collections::HashSet;

use crate::tagger::PartOfSpeech;
use crate::thesaurus::Taxonomy;

/// Reduces an inflected word to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String;
}

/// Exception-table and detachment-rule lemmatizer.
#[derive(Debug, Clone, Default)]
pub struct RuleLemmatizer {
    lexicon: HashSet<String>,
}

impl RuleLemmatizer {
    /// A lemmatizer with an empty lexicon; only exceptions and the fallback apply.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lexicon: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    /// Use every lemma of `taxonomy` as the lexicon.
    pub fn from_taxonomy(taxonomy: &Taxonomy) -> Self {
        Self::with_lexicon(taxonomy.lemmas())
    }

    fn known(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        let word = word.to_lowercase();
        if let Some(base) = exception(&word, pos) {
            return base.to_string();
        }
        if pos == PartOfSpeech::Other || self.known(&word) {
            return word;
        }

        let found = detachment_rules(pos)
            .iter()
            .filter(|(suffix, _)| word.len() > suffix.len() && word.ends_with(suffix))
            .map(|(suffix, ending)| format!("{}{}", &word[..word.len() - suffix.len()], ending))
            .find(|candidate| self.known(candidate));

        found.unwrap_or_else(|| fallback(&word, pos))
    }
}

fn detachment_rules(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => &[
            ("s", ""), ("ses", "s"), ("xes", "x"), ("zes", "z"), ("ches", "ch"),
            ("shes", "sh"), ("men", "man"), ("ies", "y"),
        ],
        PartOfSpeech::Verb => &[
            ("s", ""), ("ies", "y"), ("es", "e"), ("es", ""), ("ed", "e"), ("ed", ""),
            ("ing", "e"), ("ing", ""),
        ],
        PartOfSpeech::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        PartOfSpeech::Adverb | PartOfSpeech::Other => &[],
    }
}

fn fallback(word: &str, pos: PartOfSpeech) -> String {
    match pos {
        PartOfSpeech::Noun => strip_plural(word),
        PartOfSpeech::Verb => {
            if word.len() > 5 && word.ends_with("ing") {
                undouble(&word[..word.len() - 3])
            } else if word.len() > 4 && word.ends_with("ied") {
                format!("{}y", &word[..word.len() - 3])
            } else if word.len() > 4 && word.ends_with("ed") {
                undouble(&word[..word.len() - 2])
            } else {
                strip_plural(word)
            }
        }
        PartOfSpeech::Adjective => {
            if word.len() > 5 && word.ends_with("iest") {
                format!("{}y", &word[..word.len() - 4])
            } else if word.len() > 4 && word.ends_with("ier") {
                format!("{}y", &word[..word.len() - 3])
            } else {
                word.to_string()
            }
        }
        PartOfSpeech::Adverb | PartOfSpeech::Other => word.to_string(),
    }
}

fn strip_plural(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for sibilant in ["sses", "ches", "shes", "xes", "zes"] {
        if word.len() > sibilant.len() && word.ends_with(sibilant) {
            return word[..word.len() - 2].to_string();
        }
    }
    let keeps_s = ["ss", "us", "is"].iter().any(|end| word.ends_with(end));
    if word.len() > 3 && word.ends_with('s') && !keeps_s {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// `runn → run`, `stopp → stop`; `fall`, `pass` and `buzz` are left alone.
fn undouble(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(last), Some(prev))
            if last == prev && last.is_ascii_alphabetic() && !"aeiouylsz".contains(last) =>
        {
            stem[..stem.len() - last.len_utf8()].to_string()
        }
        _ => stem.to_string(),
    }
}

fn exception(word: &str, pos: PartOfSpeech) -> Option<&'static str> {
    let table: &[(&str, &str)] = match pos {
        PartOfSpeech::Noun => NOUN_EXCEPTIONS,
        PartOfSpeech::Verb => VERB_EXCEPTIONS,
        PartOfSpeech::Adjective => ADJECTIVE_EXCEPTIONS,
        PartOfSpeech::Adverb | PartOfSpeech::Other => return None,
    };
    table.iter().find(|(form, _)| *form == word).map(|(_, base)| *base)
}

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"), ("men", "man"), ("women", "woman"), ("mice", "mouse"),
    ("geese", "goose"), ("feet", "foot"), ("teeth", "tooth"), ("people", "person"),
    ("wolves", "wolf"), ("knives", "knife"), ("lives", "life"), ("leaves", "leaf"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"),
    ("being", "be"), ("has", "have"), ("had", "have"), ("does", "do"), ("did", "do"),
    ("done", "do"), ("goes", "go"), ("went", "go"), ("gone", "go"), ("ate", "eat"),
    ("eaten", "eat"), ("said", "say"), ("made", "make"), ("saw", "see"), ("seen", "see"),
    ("took", "take"), ("taken", "take"), ("came", "come"), ("got", "get"), ("gotten", "get"),
    ("knew", "know"), ("known", "know"), ("thought", "think"), ("ran", "run"), ("felt", "feel"),
    ("told", "tell"), ("gave", "give"), ("given", "give"), ("found", "find"), ("slept", "sleep"),
    ("drank", "drink"), ("drunk", "drink"), ("spoke", "speak"), ("spoken", "speak"),
    ("bought", "buy"), ("wrote", "write"), ("written", "write"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
];
