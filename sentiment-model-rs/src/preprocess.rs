// sentiment-model-rs/src/preprocess.rs
// Review normalization: letters only, lowercase, stopword removal, stemming

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::stem::porter_stem;

/// Token kept even though the stopword list contains it; negation flips sentiment.
pub const NEGATION: &str = "not";

static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z]").expect("static regex"));

/// Standard English stopword list (NLTK corpus).
///
/// Contracted forms ("don't", "isn't", ...) are omitted: apostrophes are
/// stripped before lookup, so only their alphabetic halves can ever match.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you",
        "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "her", "hers", "herself", "it", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are",
        "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
        "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during",
        "before", "after", "above", "below", "to", "from", "up", "down", "in",
        "out", "on", "off", "over", "under", "again", "further", "then",
        "once", "here", "there", "when", "where", "why", "how", "all", "any",
        "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s",
        "t", "can", "will", "just", "don", "should", "now", "d", "ll", "m",
        "o", "re", "ve", "y", "ain", "aren", "couldn", "didn", "doesn",
        "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn",
        "shan", "shouldn", "wasn", "weren", "won", "wouldn",
    ]
    .iter()
    .copied()
    .filter(|word| *word != NEGATION)
    .collect()
});

/// Whether `token` is dropped by the preprocessor
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Turns a raw review into the space-joined Porter stems the vectorizer was fitted on.
///
/// Stateless; one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Stemmed, stopword-filtered tokens of `text`, in order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let letters_only = NON_ALPHA.replace_all(text, " ");
        letters_only
            .to_lowercase()
            .split_whitespace()
            .filter(|token| !is_stopword(token))
            .map(porter_stem)
            .collect()
    }

    /// Full normalization. Empty or letter-free input yields an empty string.
    pub fn process(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}
