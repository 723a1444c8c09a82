use proptest::prelude::*;
use rejoinder_compare::{Comparator, ComparatorKind, Language};

const KINDS: [ComparatorKind; 3] = [
    ComparatorKind::Levenshtein,
    ComparatorKind::Synset,
    ComparatorKind::Jaccard,
];

fn comparators() -> Vec<Box<dyn Comparator>> {
    KINDS.iter().map(|k| k.build(Language::English)).collect()
}

proptest! {
    #[test]
    fn score_is_within_unit_interval(a in ".{0,60}", b in ".{0,60}") {
        for c in comparators() {
            let s = c.compare(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s), "{} scored {} for {:?} / {:?}", c.name(), s, a, b);
        }
    }

    #[test]
    fn empty_side_scores_zero(s in ".{0,60}") {
        for c in comparators() {
            prop_assert_eq!(c.compare("", &s), 0.0);
            prop_assert_eq!(c.compare(&s, ""), 0.0);
        }
    }

    #[test]
    fn lexical_identity(s in ".{1,60}") {
        let c = ComparatorKind::Levenshtein.build(Language::English);
        prop_assert_eq!(c.compare(&s, &s), 1.0);
    }

    // A leading "q" word is never an English stopword, so every statement
    // keeps at least one content word.
    #[test]
    fn linguistic_identity(s in "q[a-z]{2,8}( [a-z]{1,8}){0,4}") {
        for kind in [ComparatorKind::Synset, ComparatorKind::Jaccard] {
            let c = kind.build(Language::English);
            let score = c.compare(&s, &s);
            prop_assert!((score - 1.0).abs() < 1e-9, "{} scored {} for {:?}", kind, score, s);
        }
    }

    #[test]
    fn case_does_not_matter(s in "[a-zA-Z ]{1,40}") {
        for c in comparators() {
            let lower = s.to_lowercase();
            prop_assert_eq!(c.compare(&s, &lower), c.compare(&lower, &lower));
        }
    }
}
