// sentiment-model-rs/src/model.rs
// Model interface: preprocessing -> vectorization -> classification

use crate::classifier::{load_classifier, Classifier, Sentiment};
use crate::error::{ModelError, Result};
use crate::preprocess::Preprocessor;
use crate::vectorizer::{BagOfWordsVectorizer, FeatureVector};
use std::path::Path;

/// Owns the fitted vectorizer and classifier.
///
/// Built once at startup and shared read-only afterwards; every method takes
/// `&self` and none of them mutate, so an `Arc<ModelInterface>` needs no lock.
#[derive(Debug)]
pub struct ModelInterface {
    preprocessor: Preprocessor,
    vectorizer: BagOfWordsVectorizer,
    classifier: Box<dyn Classifier>,
}

impl ModelInterface {
    /// Pair a vectorizer with a classifier fitted on the same feature width.
    pub fn new(vectorizer: BagOfWordsVectorizer, classifier: Box<dyn Classifier>) -> Result<Self> {
        if classifier.n_features() != vectorizer.width() {
            return Err(ModelError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.width(),
            });
        }

        Ok(Self {
            preprocessor: Preprocessor::new(),
            vectorizer,
            classifier,
        })
    }

    /// Load both artifacts from disk. Any failure here is fatal for the service.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(vectorizer_path: P, classifier_path: Q) -> Result<Self> {
        let vectorizer = BagOfWordsVectorizer::load(vectorizer_path.as_ref())?;
        let classifier = load_classifier(classifier_path.as_ref())?;

        let model = Self::new(vectorizer, classifier)?;
        tracing::info!(
            vectorizer = %vectorizer_path.as_ref().display(),
            classifier = %classifier_path.as_ref().display(),
            kind = model.classifier_kind(),
            vocabulary_size = model.vocabulary_size(),
            "Model artifacts loaded"
        );
        Ok(model)
    }

    pub fn preprocess(&self, review: &str) -> String {
        self.preprocessor.process(review)
    }

    pub fn vectorize(&self, processed_review: &str) -> FeatureVector {
        self.vectorizer.transform(processed_review)
    }

    /// Predict the sentiment of a review.
    ///
    /// Pass `already_preprocessed = true` when `review` is the output of
    /// [`ModelInterface::preprocess`]; otherwise it is normalized first.
    pub fn predict(&self, review: &str, already_preprocessed: bool) -> Result<Sentiment> {
        let features = if already_preprocessed {
            self.vectorize(review)
        } else {
            self.vectorize(&self.preprocess(review))
        };

        if features.is_zero() {
            tracing::debug!("Review has no in-vocabulary terms");
        }

        self.classifier.predict(&features)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.width()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }
}
