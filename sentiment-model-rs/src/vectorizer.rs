//! Bag-of-words vectorization
//!
//! Maps a processed review onto the fixed vocabulary fitted at training time.
//! The artifact mirrors scikit-learn's `CountVectorizer`: term → column map,
//! token pattern, lowercase flag, binary flag and n-gram range.

use crate::error::{ModelError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// scikit-learn's default token pattern; single-character tokens never match.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// On-disk form of a fitted vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

/// Dense term-count vector, one column per vocabulary entry
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0.0; width],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// True when no vocabulary term was seen
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Dot product with a weight row of the same width
    pub fn dot(&self, weights: &[f64]) -> Result<f64> {
        if weights.len() != self.values.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                actual: self.values.len(),
            });
        }
        Ok(self.values.iter().zip(weights).map(|(x, w)| x * w).sum())
    }
}

/// Fitted bag-of-words vectorizer. Immutable once built.
#[derive(Debug, Clone)]
pub struct BagOfWordsVectorizer {
    vocabulary: HashMap<String, usize>,
    binary: bool,
    lowercase: bool,
    token_regex: Regex,
    ngram_range: (usize, usize),
}

impl BagOfWordsVectorizer {
    /// Build from a decoded artifact, checking that columns form `0..n`.
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let width = artifact.vocabulary.len();
        if width == 0 {
            return Err(ModelError::invalid("vectorizer vocabulary is empty"));
        }

        let mut seen = vec![false; width];
        for (term, &column) in &artifact.vocabulary {
            if column >= width {
                return Err(ModelError::invalid(format!(
                    "vocabulary column {} for term '{}' is outside 0..{}",
                    column, term, width
                )));
            }
            if std::mem::replace(&mut seen[column], true) {
                return Err(ModelError::invalid(format!(
                    "vocabulary column {} is assigned to more than one term",
                    column
                )));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::invalid(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(&artifact.token_pattern).map_err(|e| {
            ModelError::invalid(format!("invalid token_pattern '{}': {}", artifact.token_pattern, e))
        })?;
        if token_regex.captures_len() > 2 {
            return Err(ModelError::invalid(
                "token_pattern may contain at most one capturing group",
            ));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            binary: artifact.binary,
            lowercase: artifact.lowercase,
            token_regex,
            ngram_range: artifact.ngram_range,
        })
    }

    /// Unigram vectorizer over `terms`, columns assigned in sorted term order.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        let mut sorted: Vec<&str> = terms.iter().map(|t| t.as_ref()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let vocabulary = sorted
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        Self::from_artifact(VectorizerArtifact {
            vocabulary,
            binary: false,
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
        })
    }

    /// Read and validate a JSON artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: VectorizerArtifact =
            serde_json::from_str(&raw).map_err(|source| ModelError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    /// Number of feature columns
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Count vocabulary terms in `document`. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut vector = FeatureVector::zeros(self.width());

        for term in self.analyze(document) {
            if let Some(column) = self.column(&term) {
                if self.binary {
                    vector.values[column] = 1.0;
                } else {
                    vector.values[column] += 1.0;
                }
            }
        }

        vector
    }

    /// Tokens and n-grams in the order they are counted
    fn analyze(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        let tokens: Vec<&str> = if self.token_regex.captures_len() == 2 {
            self.token_regex
                .captures_iter(&text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_regex.find_iter(&text).map(|m| m.as_str()).collect()
        };

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(terms: &[(&str, usize)]) -> VectorizerArtifact {
        VectorizerArtifact {
            vocabulary: terms.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
            binary: false,
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            ngram_range: (1, 1),
        }
    }

    #[test]
    fn test_counts_known_terms() {
        let vectorizer = BagOfWordsVectorizer::from_terms(&["good", "not", "food"]).unwrap();
        assert_eq!(vectorizer.width(), 3);
        // sorted: food=0, good=1, not=2
        let vector = vectorizer.transform("not good not good food");
        assert_eq!(vector.values(), &[1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let vectorizer = BagOfWordsVectorizer::from_terms(&["good", "bad"]).unwrap();
        assert!(vectorizer.transform("mediocr servic").is_zero());
        assert!(vectorizer.transform("").is_zero());
        assert_eq!(vectorizer.transform("").len(), 2);
    }

    #[test]
    fn test_single_character_tokens_skipped() {
        let vectorizer = BagOfWordsVectorizer::from_terms(&["a", "ok"]).unwrap();
        let vector = vectorizer.transform("a ok a");
        assert_eq!(vector.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_binary_and_bigrams() {
        let mut art = artifact(&[("not", 0), ("good", 1), ("not good", 2)]);
        art.binary = true;
        art.ngram_range = (1, 2);
        let vectorizer = BagOfWordsVectorizer::from_artifact(art).unwrap();
        let vector = vectorizer.transform("not good not good");
        assert_eq!(vector.values(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rejects_broken_vocabulary() {
        assert!(BagOfWordsVectorizer::from_artifact(artifact(&[])).is_err());
        assert!(BagOfWordsVectorizer::from_artifact(artifact(&[("a", 0), ("b", 0)])).is_err());
        assert!(BagOfWordsVectorizer::from_artifact(artifact(&[("a", 0), ("b", 5)])).is_err());

        let mut bad_pattern = artifact(&[("a", 0)]);
        bad_pattern.token_pattern = "(".to_string();
        assert!(matches!(
            BagOfWordsVectorizer::from_artifact(bad_pattern),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_dot_checks_width() {
        let vector = FeatureVector::new(vec![1.0, 2.0]);
        assert_eq!(vector.dot(&[0.5, 0.25]).unwrap(), 1.0);
        assert!(matches!(
            vector.dot(&[1.0]),
            Err(ModelError::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }
}
