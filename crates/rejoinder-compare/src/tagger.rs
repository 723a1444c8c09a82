//! Part-of-speech tagging.
//!
//! [`RuleTagger`] is a lightweight tagger: a closed-class lexicon for the
//! most frequent English words, a verb cue after `to` and modal verbs, and
//! suffix rules for everything else.  Unknown words default to nouns.  It is
//! good enough to pick a lemmatization rule set; it makes no claim to
//! linguistic accuracy.

/// The coarse word classes lemmatization distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    /// Determiners, pronouns, prepositions, numbers and the like.
    Other,
}

impl PartOfSpeech {
    /// Map a Penn Treebank tag (`NN`, `VBD`, `JJR`, `RB`, …) to a word class.
    pub fn from_treebank(tag: &str) -> Self {
        match tag.chars().next() {
            Some('J') => PartOfSpeech::Adjective,
            Some('V') => PartOfSpeech::Verb,
            Some('N') => PartOfSpeech::Noun,
            Some('R') => PartOfSpeech::Adverb,
            _ => PartOfSpeech::Other,
        }
    }
}

/// Assigns a [`PartOfSpeech`] to each token of a sentence.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<(String, PartOfSpeech)>;
}

/// Lexicon and suffix-rule tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_word(word: &str, previous: Option<&str>) -> PartOfSpeech {
        if word.chars().all(|c| c.is_ascii_digit()) {
            return PartOfSpeech::Other;
        }
        if let Some(pos) = lexicon_lookup(word) {
            return pos;
        }
        if previous.is_some_and(|p| VERB_CUES.contains(&p)) {
            return PartOfSpeech::Verb;
        }
        if word.len() > 3 && word.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }
        if word.len() > 4 && (word.ends_with("ing") || word.ends_with("ed")) {
            return PartOfSpeech::Verb;
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
        {
            return PartOfSpeech::Adjective;
        }
        PartOfSpeech::Noun
    }
}

impl PosTagger for RuleTagger {
    fn tag(&self, tokens: &[String]) -> Vec<(String, PartOfSpeech)> {
        let mut previous: Option<String> = None;
        tokens
            .iter()
            .map(|token| {
                let lower = token.to_lowercase();
                let pos = Self::tag_word(&lower, previous.as_deref());
                previous = Some(lower);
                (token.clone(), pos)
            })
            .collect()
    }
}

fn lexicon_lookup(word: &str) -> Option<PartOfSpeech> {
    if CLOSED_CLASS.contains(&word) {
        Some(PartOfSpeech::Other)
    } else if COMMON_VERBS.contains(&word) {
        Some(PartOfSpeech::Verb)
    } else if COMMON_ADVERBS.contains(&word) {
        Some(PartOfSpeech::Adverb)
    } else if COMMON_ADJECTIVES.contains(&word) {
        Some(PartOfSpeech::Adjective)
    } else {
        None
    }
}

const VERB_CUES: &[&str] = &[
    "to", "can", "could", "will", "would", "shall", "should", "may", "might", "must", "don't",
    "doesn't", "didn't", "won't", "can't",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish", "ic", "al"];

const CLOSED_CLASS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we",
    "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
    "and", "or", "but", "nor", "if", "because", "of", "at", "by", "for", "with", "about",
    "into", "through", "to", "from", "in", "on", "off", "over", "under", "what", "which",
    "who", "whom", "whose", "there", "can", "could", "will", "would", "shall", "should", "may",
    "might", "must",
];

const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "have", "has", "had", "do",
    "does", "did", "go", "goes", "went", "gone", "eat", "eats", "ate", "eaten", "like",
    "likes", "want", "wants", "know", "knows", "knew", "think", "thinks", "thought", "say",
    "says", "said", "see", "sees", "saw", "seen", "get", "gets", "got", "make", "makes",
    "made", "take", "takes", "took", "come", "comes", "came", "tell", "tells", "told", "feel",
    "feels", "felt", "love", "loves", "need", "needs", "help", "helps", "run", "runs", "ran",
    "sleep", "sleeps", "slept", "drink", "drinks", "drank", "speak", "speaks", "spoke",
    "give", "gives", "gave", "find", "finds", "found", "buy", "bought",
];

const COMMON_ADVERBS: &[&str] = &[
    "very", "really", "not", "too", "so", "well", "now", "here", "quite", "also", "just",
    "always", "never", "often", "soon", "again", "already", "still",
];

const COMMON_ADJECTIVES: &[&str] = &[
    "good", "bad", "young", "old", "new", "big", "small", "little", "hungry", "happy", "sad",
    "great", "nice", "fine", "better", "best", "worse", "worst", "tired", "hot", "cold",
    "large", "long", "short",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(sentence: &str) -> Vec<PartOfSpeech> {
        let tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        RuleTagger::new().tag(&tokens).into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn tags_the_canonical_sentence() {
        use PartOfSpeech::*;
        assert_eq!(tags("the young cat is hungry"), vec![Other, Adjective, Noun, Verb, Adjective]);
        assert_eq!(tags("the cat is very hungry"), vec![Other, Noun, Verb, Adverb, Adjective]);
    }

    #[test]
    fn suffix_rules() {
        use PartOfSpeech::*;
        assert_eq!(tags("quickly jumping painted famous"), vec![Adverb, Verb, Verb, Adjective]);
    }

    #[test]
    fn word_after_to_or_modal_is_a_verb() {
        use PartOfSpeech::*;
        assert_eq!(tags("to dance"), vec![Other, Verb]);
        assert_eq!(tags("should dance"), vec![Other, Verb]);
        assert_eq!(tags("a dance"), vec![Other, Noun]);
    }

    #[test]
    fn tagging_is_case_insensitive_but_keeps_tokens() {
        let tokens = vec!["Cats".to_string()];
        let tagged = RuleTagger::new().tag(&tokens);
        assert_eq!(tagged[0].0, "Cats");
        assert_eq!(tagged[0].1, PartOfSpeech::Noun);
    }

    #[test]
    fn numbers_are_other() {
        assert_eq!(tags("42"), vec![PartOfSpeech::Other]);
    }

    #[test]
    fn treebank_mapping() {
        assert_eq!(PartOfSpeech::from_treebank("JJR"), PartOfSpeech::Adjective);
        assert_eq!(PartOfSpeech::from_treebank("VBD"), PartOfSpeech::Verb);
        assert_eq!(PartOfSpeech::from_treebank("NNS"), PartOfSpeech::Noun);
        assert_eq!(PartOfSpeech::from_treebank("RB"), PartOfSpeech::Adverb);
        assert_eq!(PartOfSpeech::from_treebank("DT"), PartOfSpeech::Other);
    }
}
