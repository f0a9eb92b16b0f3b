//! Fitted classifiers
//!
//! The classifier artifact is a tagged JSON document; `kind` selects one of
//! the estimators below. All of them map a [`FeatureVector`] onto a binary
//! [`Sentiment`] and agree with scikit-learn's `predict` for the same
//! parameters (argmax of the joint log-likelihood, first class wins ties).

use crate::error::{ModelError, Result};
use crate::vectorizer::FeatureVector;
use serde::{Deserialize, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;
use std::fs;
use std::path::Path;

/// Binary sentiment label, serialized as its integer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    pub fn label(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sentiment::Positive
    }
}

impl TryFrom<i64> for Sentiment {
    type Error = ModelError;

    fn try_from(label: i64) -> Result<Self> {
        match label {
            0 => Ok(Sentiment::Negative),
            1 => Ok(Sentiment::Positive),
            other => Err(ModelError::InvalidLabel(other)),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Positive => write!(f, "positive"),
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.label())
    }
}

/// A fitted estimator with a fixed input width
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short name used in logs and the health endpoint
    fn kind(&self) -> &'static str;

    /// Number of features the estimator was fitted on
    fn n_features(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<Sentiment>;
}

/// On-disk form of a fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    GaussianNb {
        classes: Vec<i64>,
        class_prior: Vec<f64>,
        theta: Vec<Vec<f64>>,
        var: Vec<Vec<f64>>,
    },
    MultinomialNb {
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
    LogisticRegression {
        classes: Vec<i64>,
        coef: Vec<f64>,
        intercept: f64,
    },
}

impl ClassifierArtifact {
    pub fn build(self) -> Result<Box<dyn Classifier>> {
        Ok(match self {
            ClassifierArtifact::GaussianNb {
                classes,
                class_prior,
                theta,
                var,
            } => Box::new(GaussianNb::new(classes, class_prior, theta, var)?),
            ClassifierArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => Box::new(MultinomialNb::new(classes, class_log_prior, feature_log_prob)?),
            ClassifierArtifact::LogisticRegression {
                classes,
                coef,
                intercept,
            } => Box::new(LogisticRegression::new(classes, coef, intercept)?),
        })
    }
}

/// Read, decode and validate a classifier artifact
pub fn load_classifier<P: AsRef<Path>>(path: P) -> Result<Box<dyn Classifier>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ClassifierArtifact =
        serde_json::from_str(&raw).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.build()
}

fn sentiment_classes(classes: &[i64]) -> Result<Vec<Sentiment>> {
    if classes.is_empty() {
        return Err(ModelError::invalid("classifier has no classes"));
    }
    let labels = classes
        .iter()
        .map(|&c| Sentiment::try_from(c))
        .collect::<Result<Vec<_>>>()?;
    if labels.len() > 2 || (labels.len() == 2 && labels[0] == labels[1]) {
        return Err(ModelError::invalid(format!(
            "classifier classes {:?} are not distinct sentiment labels",
            classes
        )));
    }
    Ok(labels)
}

/// Per-class rows must all share one width; returns it.
fn row_width(name: &str, rows: &[Vec<f64>], n_classes: usize) -> Result<usize> {
    if rows.len() != n_classes {
        return Err(ModelError::invalid(format!(
            "{} has {} rows for {} classes",
            name,
            rows.len(),
            n_classes
        )));
    }
    let width = rows[0].len();
    if width == 0 {
        return Err(ModelError::invalid(format!("{} rows are empty", name)));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(ModelError::DimensionMismatch {
            expected: width,
            actual: row.len(),
        });
    }
    Ok(width)
}

fn check_width(expected: usize, features: &FeatureVector) -> Result<()> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

/// Index of the largest score; the first one wins ties.
fn argmax(scores: &[f64]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_score), (i, &score)| {
            if score > best_score {
                (i, score)
            } else {
                (best, best_score)
            }
        })
        .0
}

/// Gaussian naive Bayes over raw term counts
#[derive(Debug, Clone)]
pub struct GaussianNb {
    classes: Vec<Sentiment>,
    log_prior: Vec<f64>,
    theta: Vec<Vec<f64>>,
    var: Vec<Vec<f64>>,
    // -0.5 * sum(ln(2*pi*var)) per class
    log_norm: Vec<f64>,
    width: usize,
}

impl GaussianNb {
    pub fn new(
        classes: Vec<i64>,
        class_prior: Vec<f64>,
        theta: Vec<Vec<f64>>,
        var: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let classes = sentiment_classes(&classes)?;
        if class_prior.len() != classes.len() {
            return Err(ModelError::invalid("class_prior length differs from classes"));
        }
        if class_prior.iter().any(|p| !(*p > 0.0 && *p <= 1.0)) {
            return Err(ModelError::invalid("class_prior entries must lie in (0, 1]"));
        }
        let width = row_width("theta", &theta, classes.len())?;
        let var_width = row_width("var", &var, classes.len())?;
        if var_width != width {
            return Err(ModelError::DimensionMismatch {
                expected: width,
                actual: var_width,
            });
        }
        if var.iter().flatten().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(ModelError::invalid("var entries must be positive and finite"));
        }

        let log_norm = var
            .iter()
            .map(|row| -0.5 * row.iter().map(|v| (2.0 * PI * v).ln()).sum::<f64>())
            .collect();

        Ok(Self {
            classes,
            log_prior: class_prior.iter().map(|p| p.ln()).collect(),
            theta,
            var,
            log_norm,
            width,
        })
    }

    fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        (0..self.classes.len())
            .map(|c| {
                let squared: f64 = x
                    .iter()
                    .zip(&self.theta[c])
                    .zip(&self.var[c])
                    .map(|((xi, mean), var)| (xi - mean).powi(2) / var)
                    .sum();
                self.log_prior[c] + self.log_norm[c] - 0.5 * squared
            })
            .collect()
    }
}

impl Classifier for GaussianNb {
    fn kind(&self) -> &'static str {
        "gaussian_nb"
    }

    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        check_width(self.width, features)?;
        let scores = self.joint_log_likelihood(features.values());
        Ok(self.classes[argmax(&scores)])
    }
}

/// Multinomial naive Bayes
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    classes: Vec<Sentiment>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    width: usize,
}

impl MultinomialNb {
    pub fn new(
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let classes = sentiment_classes(&classes)?;
        if class_log_prior.len() != classes.len() {
            return Err(ModelError::invalid("class_log_prior length differs from classes"));
        }
        let width = row_width("feature_log_prob", &feature_log_prob, classes.len())?;
        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            width,
        })
    }
}

impl Classifier for MultinomialNb {
    fn kind(&self) -> &'static str {
        "multinomial_nb"
    }

    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        check_width(self.width, features)?;
        let scores = self
            .feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| features.dot(row).map(|s| s + prior))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.classes[argmax(&scores)])
    }
}

/// Binary logistic regression; only the sign of the decision matters for `predict`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    negative: Sentiment,
    positive: Sentiment,
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(classes: Vec<i64>, coef: Vec<f64>, intercept: f64) -> Result<Self> {
        let classes = sentiment_classes(&classes)?;
        if classes.len() != 2 {
            return Err(ModelError::invalid("logistic_regression needs exactly two classes"));
        }
        if coef.is_empty() {
            return Err(ModelError::invalid("logistic_regression coef is empty"));
        }
        Ok(Self {
            negative: classes[0],
            positive: classes[1],
            coef,
            intercept,
        })
    }

    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        Ok(features.dot(&self.coef)? + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        check_width(self.coef.len(), features)?;
        if self.decision_function(features)? > 0.0 {
            Ok(self.positive)
        } else {
            Ok(self.negative)
        }
    }
}
