use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::Result;

use super::item::Encoded;

/// A trait for binary classifiers that can back the text classification pipeline
pub trait Classifier {
    /// Fit the classifier's own parameters with mini-batch gradient descent.
    ///
    /// `validation` is scored after every epoch and only feeds the returned history.
    fn train(
        &mut self,
        train: Vec<Encoded>,
        validation: Vec<Encoded>,
        epochs: usize,
        batch_size: usize,
    ) -> Result<History>;

    /// Score token id sequences, one unclipped score per row, in input order
    fn predict(&self, sequences: Vec<Vec<usize>>) -> Result<Vec<f32>>;
}

/// Loss and accuracy on both sets at the end of an epoch
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,

    /// Mean training loss
    pub loss: f64,

    /// Training accuracy
    pub accuracy: f64,

    /// Mean validation loss
    pub val_loss: f64,

    /// Validation accuracy
    pub val_accuracy: f64,
}

/// Per-epoch metrics recorded while training
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// One entry per completed epoch
    pub epochs: Vec<EpochMetrics>,
}

impl History {
    /// Record a completed epoch
    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    /// Number of recorded epochs
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Metrics of the final epoch
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Training accuracy curve
    pub fn accuracy(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.accuracy).collect()
    }

    /// Validation accuracy curve
    pub fn val_accuracy(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.val_accuracy).collect()
    }

    /// Training loss curve
    pub fn loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.loss).collect()
    }

    /// Validation loss curve
    pub fn val_loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.val_loss).collect()
    }
}
