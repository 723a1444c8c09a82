//! Language resources: stopword lists and the word tokenizer.
//!
//! A [`Language`] is plain configuration.  Comparators hold one and consult
//! it for stopwords and tokenization; switching language never changes the
//! comparator call contract.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages with bundled stopword lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    /// ISO 639-1 code.
    pub fn iso_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    /// The stopword list for this language, lowercase.
    pub fn stopwords(&self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_STOPWORDS,
            Language::Spanish => SPANISH_STOPWORDS,
        }
    }

    /// The stopword list collected into a set for repeated lookups.
    pub fn stopword_set(&self) -> HashSet<&'static str> {
        self.stopwords().iter().copied().collect()
    }

    /// Split `text` into word tokens.
    ///
    /// Tokens are maximal runs of alphanumeric characters; an apostrophe or
    /// hyphen is kept only between two alphanumerics (`don't`, `well-known`).
    /// Punctuation never forms a token of its own.  Case is preserved.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c.is_alphanumeric() {
                current.push(c);
                continue;
            }
            let joins_word = (c == '\'' || c == '’' || c == '-')
                && !current.is_empty()
                && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if joins_word {
                current.push(if c == '’' { '\'' } else { c });
            } else if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }
}

/// Remove every ASCII punctuation character from `text`.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Spanish => write!(f, "spanish"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" | "eng" => Ok(Language::English),
            "spanish" | "es" | "spa" => Ok(Language::Spanish),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stopword lists
// ─────────────────────────────────────────────────────────────────────────────

const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've",
    "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't",
    "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
    "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't",
    "won", "won't", "wouldn", "wouldn't", "it's", "you're", "you've",
    "you'll", "you'd", "she's", "that'll",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por",
    "un", "para", "con", "no", "una", "su", "al", "lo", "como", "más", "pero",
    "sus", "le", "ya", "o", "este", "sí", "porque", "esta", "entre", "cuando",
    "muy", "sin", "sobre", "también", "me", "hasta", "hay", "donde", "quien",
    "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni", "contra",
    "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes",
    "algunos", "qué", "unos", "yo", "otro", "otras", "otra", "él", "tanto",
    "esa", "estos", "mucho", "quienes", "nada", "muchos", "cual", "poco",
    "ella", "estar", "estas", "algunas", "algo", "nosotros", "mi", "mis",
    "tú", "te", "ti", "tu", "tus", "ellas", "nosotras", "vosotros",
    "vosotras", "os", "mío", "mía", "míos", "mías", "tuyo", "tuya", "tuyos",
    "tuyas", "suyo", "suya", "suyos", "suyas", "es", "son", "fue", "era",
    "soy", "eres", "somos", "estoy", "estás", "está", "estamos", "están",
    "he", "has", "ha", "hemos", "han",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_punctuation() {
        let tokens = Language::English.tokenize("Hello, world! How are you?");
        assert_eq!(tokens, vec!["Hello", "world", "How", "are", "you"]);
    }

    #[test]
    fn tokenize_keeps_inner_apostrophes_and_hyphens() {
        let tokens = Language::English.tokenize("don't be a well-known 'quote' -");
        assert_eq!(tokens, vec!["don't", "be", "a", "well-known", "quote"]);
    }

    #[test]
    fn tokenize_normalises_typographic_apostrophe() {
        assert_eq!(Language::English.tokenize("it’s"), vec!["it's"]);
    }

    #[test]
    fn tokenize_empty_and_punctuation_only() {
        assert!(Language::English.tokenize("").is_empty());
        assert!(Language::English.tokenize("?!... --").is_empty());
    }

    #[test]
    fn tokenize_handles_non_ascii_letters() {
        let tokens = Language::Spanish.tokenize("¿Qué tal, señor?");
        assert_eq!(tokens, vec!["Qué", "tal", "señor"]);
    }

    #[test]
    fn english_stopwords_cover_function_words_only() {
        let set = Language::English.stopword_set();
        assert!(set.contains("the"));
        assert!(set.contains("is"));
        assert!(!set.contains("very"));
        assert!(!set.contains("cat"));
        assert!(!set.contains("hello"));
    }

    #[test]
    fn spanish_stopwords_differ_from_english() {
        let set = Language::Spanish.stopword_set();
        assert!(set.contains("el"));
        assert!(!set.contains("the"));
    }

    #[test]
    fn strip_punctuation_removes_ascii_marks() {
        assert_eq!(strip_punctuation("hungry. Don't!"), "hungry Dont");
    }

    #[test]
    fn language_from_str_and_display() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::English));
        assert_eq!("spanish".parse::<Language>(), Ok(Language::Spanish));
        assert!("klingon".parse::<Language>().is_err());
        assert_eq!(Language::Spanish.to_string(), "spanish");
        assert_eq!(Language::English.iso_code(), "en");
    }
}
