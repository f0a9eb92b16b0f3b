//! Service metrics
//!
//! [`ServiceMetrics`] is the explicitly owned registry handed to every
//! handler through the application state. It keeps authoritative counts in
//! atomics (plus a lock-guarded per-sender tally) and publishes every update
//! through the `metrics` facade to the Prometheus recorder that backs
//! `/metrics`. Counters only ever go up; the accuracy gauge is derived from
//! them.

use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use sentiment_model::Sentiment;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Label used when a request names no sender
pub const ANONYMOUS_SENDER: &str = "anonymous";

pub const PREDICTIONS: &str = "predictions_total";
pub const PREDICTIONS_BY_SENTIMENT: &str = "predictions_by_sentiment_total";
pub const VALIDATIONS: &str = "validations_total";
pub const VALIDATIONS_BY_SENDER: &str = "validations_by_sender_total";
pub const ACCURACY: &str = "validation_accuracy_percent";

/// Register help texts with the installed recorder
pub fn describe_metrics() {
    describe_counter!(PREDICTIONS, "The number of predictions served by the model.");
    describe_counter!(
        PREDICTIONS_BY_SENTIMENT,
        "The number of predictions served, by predicted sentiment."
    );
    describe_counter!(VALIDATIONS, "The number of validations that are correct/incorrect.");
    describe_counter!(
        VALIDATIONS_BY_SENDER,
        "The number of correct/incorrect validations per sender."
    );
    describe_gauge!(
        ACCURACY,
        Unit::Percent,
        "Share of validations that confirmed the prediction."
    );
}

/// Install the process-wide Prometheus recorder and register help texts.
///
/// Fails if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// Correct/incorrect validation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationTally {
    pub correct: u64,
    pub incorrect: u64,
}

impl ValidationTally {
    pub fn total(&self) -> u64 {
        self.correct + self.incorrect
    }

    /// `correct / total * 100`, or `None` before the first validation
    pub fn accuracy_percent(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.correct as f64 / total as f64 * 100.0),
        }
    }

    fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }
}

#[derive(Debug, Default)]
struct SenderTallies {
    predictions: BTreeMap<String, u64>,
    validations: BTreeMap<String, ValidationTally>,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub positive_predictions: u64,
    pub negative_predictions: u64,
    pub validations: ValidationTally,
    pub predictions_by_sender: BTreeMap<String, u64>,
    pub validations_by_sender: BTreeMap<String, ValidationTally>,
}

#[derive(Debug, Default)]
pub struct ServiceMetrics {
    predictions: AtomicU64,
    positive_predictions: AtomicU64,
    negative_predictions: AtomicU64,
    correct_validations: AtomicU64,
    incorrect_validations: AtomicU64,
    by_sender: RwLock<SenderTallies>,
}

fn sender_label(sender: Option<&str>) -> String {
    sender.unwrap_or(ANONYMOUS_SENDER).to_string()
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_prediction(&self, sender: Option<&str>, sentiment: Sentiment) {
        let sender = sender_label(sender);

        self.predictions.fetch_add(1, Ordering::Relaxed);
        match sentiment {
            Sentiment::Positive => self.positive_predictions.fetch_add(1, Ordering::Relaxed),
            Sentiment::Negative => self.negative_predictions.fetch_add(1, Ordering::Relaxed),
        };

        {
            let mut tallies = self.by_sender.write().await;
            *tallies.predictions.entry(sender.clone()).or_insert(0) += 1;
        }

        counter!(PREDICTIONS, 1, "sender" => sender);
        counter!(PREDICTIONS_BY_SENTIMENT, 1, "sentiment" => sentiment.label().to_string());
    }

    pub async fn record_validation(&self, sender: Option<&str>, correct: bool) {
        let sender = sender_label(sender);
        let is_correct = if correct { "true" } else { "false" };

        // Tally and gauge update under one guard; the last gauge write sees the latest tally.
        let mut tallies = self.by_sender.write().await;
        if correct {
            self.correct_validations.fetch_add(1, Ordering::Relaxed);
        } else {
            self.incorrect_validations.fetch_add(1, Ordering::Relaxed);
        }
        tallies
            .validations
            .entry(sender.clone())
            .or_default()
            .record(correct);

        counter!(VALIDATIONS, 1, "is_correct" => is_correct);
        counter!(VALIDATIONS_BY_SENDER, 1, "sender" => sender, "is_correct" => is_correct);
        if let Some(accuracy) = self.validation_tally().accuracy_percent() {
            gauge!(ACCURACY, accuracy);
        }
    }

    pub fn predictions(&self) -> u64 {
        self.predictions.load(Ordering::Relaxed)
    }

    pub fn validation_tally(&self) -> ValidationTally {
        ValidationTally {
            correct: self.correct_validations.load(Ordering::Relaxed),
            incorrect: self.incorrect_validations.load(Ordering::Relaxed),
        }
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let tallies = self.by_sender.read().await;
        MetricsSnapshot {
            predictions: self.predictions(),
            positive_predictions: self.positive_predictions.load(Ordering::Relaxed),
            negative_predictions: self.negative_predictions.load(Ordering::Relaxed),
            validations: self.validation_tally(),
            predictions_by_sender: tallies.predictions.clone(),
            validations_by_sender: tallies.validations.clone(),
        }
    }
}
