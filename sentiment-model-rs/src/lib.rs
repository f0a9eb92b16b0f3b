//! # Sentiment Model
//!
//! Bag-of-words sentiment classification for short reviews: text
//! normalization, a fixed-vocabulary count vectorizer and a small set of
//! fitted classifiers, tied together by [`ModelInterface`].
//!
//! Artifacts are JSON documents produced at training time; this crate only
//! loads and applies them.

pub mod classifier;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod stem;
pub mod vectorizer;

pub use classifier::{
    load_classifier, Classifier, ClassifierArtifact, GaussianNb, LogisticRegression, MultinomialNb,
    Sentiment,
};
pub use error::{ModelError, Result};
pub use model::ModelInterface;
pub use preprocess::Preprocessor;
pub use stem::porter_stem;
pub use vectorizer::{BagOfWordsVectorizer, FeatureVector, VectorizerArtifact};
