use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scores at or above this value count as positive
pub const THRESHOLD: f32 = 0.5;

/// Map continuous scores to binary predictions
pub fn binarize(scores: &[f32]) -> Vec<u8> {
    scores
        .iter()
        .map(|&score| if score < THRESHOLD { 0 } else { 1 })
        .collect()
}

/// Counts of (true label, predicted label) pairs, laid out as `[[TN, FP], [FN, TP]]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True 0, predicted 0
    pub true_negative: usize,

    /// True 0, predicted 1
    pub false_positive: usize,

    /// True 1, predicted 0
    pub false_negative: usize,

    /// True 1, predicted 1
    pub true_positive: usize,
}

impl ConfusionMatrix {
    /// Tally paired labels and predictions
    pub fn from_predictions(labels: &[u8], predictions: &[u8]) -> Self {
        let mut matrix = Self::default();

        for (&label, &prediction) in labels.iter().zip(predictions) {
            match (label, prediction) {
                (0, 0) => matrix.true_negative += 1,
                (0, _) => matrix.false_positive += 1,
                (_, 0) => matrix.false_negative += 1,
                _ => matrix.true_positive += 1,
            }
        }

        matrix
    }

    /// Rows indexed by true label, columns by predicted label
    pub fn rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    /// Total number of pairs
    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Fraction of correct predictions
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// Positive-class F1, zero when there is no true positive
    pub fn f1(&self) -> f64 {
        let tp = 2 * self.true_positive;

        ratio(tp, tp + self.false_positive + self.false_negative)
    }

    /// Fraction of actual positives predicted positive
    pub fn true_positive_rate(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Fraction of actual negatives predicted positive
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positive, self.false_positive + self.true_negative)
    }
}

impl Display for ConfusionMatrix {
    /// Renders in the familiar `[[a b]\n [c d]]` layout
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows();
        let width = rows
            .iter()
            .flatten()
            .map(|count| count.to_string().len())
            .max()
            .unwrap_or(1);

        write!(
            f,
            "[[{:>w$} {:>w$}]\n [{:>w$} {:>w$}]]",
            rows[0][0],
            rows[0][1],
            rows[1][0],
            rows[1][1],
            w = width
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Points of a receiver operating characteristic curve
#[derive(Clone, Debug, PartialEq)]
pub struct RocCurve {
    /// False positive rate at each threshold
    pub fpr: Vec<f64>,

    /// True positive rate at each threshold
    pub tpr: Vec<f64>,

    /// Decreasing thresholds, starting at infinity
    pub thresholds: Vec<f64>,
}

/// Sweep every distinct score as a threshold, from the highest down
pub fn roc_curve(labels: &[u8], scores: &[f64]) -> Result<RocCurve> {
    let positives = labels.iter().filter(|&&label| label == 1).count();
    let negatives = labels.len() - positives;

    if positives == 0 || negatives == 0 {
        return Err(Error::invalid_input(
            "evaluation",
            "the ROC curve is undefined when the labels hold a single class",
        ));
    }

    let mut ranked: Vec<(f64, u8)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };

    let (mut tp, mut fp) = (0usize, 0usize);

    for (i, &(score, label)) in ranked.iter().enumerate() {
        if label == 1 {
            tp += 1;
        } else {
            fp += 1;
        }

        // Emit a point only once every row sharing this score is counted
        let last_of_score = ranked.get(i + 1).map_or(true, |next| next.0 != score);

        if last_of_score {
            curve.fpr.push(fp as f64 / negatives as f64);
            curve.tpr.push(tp as f64 / positives as f64);
            curve.thresholds.push(score);
        }
    }

    Ok(curve)
}

/// Area under a curve by the trapezoidal rule
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
        .sum()
}

/// Metrics of a binary classifier on a held-out set
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of correct binarized predictions
    pub accuracy: f64,

    /// Positive-class F1
    pub f1: f64,

    /// Area under the ROC curve of the binarized predictions
    pub auc: f64,

    /// Label/prediction counts
    pub confusion_matrix: ConfusionMatrix,
}

/// Binarize the scores at `THRESHOLD` and measure them against the true labels.
///
/// The ROC curve is swept over the binarized predictions rather than the raw scores, so it only
/// ever has one interior point and the AUC equals `(1 + TPR - FPR) / 2`.
pub fn evaluate(labels: &[u8], scores: &[f32]) -> Result<Evaluation> {
    if labels.is_empty() {
        return Err(Error::invalid_input("evaluation", "no labels to evaluate"));
    }

    if labels.len() != scores.len() {
        return Err(Error::invalid_input(
            "evaluation",
            format!("{} labels but {} scores", labels.len(), scores.len()),
        ));
    }

    if let Some(label) = labels.iter().find(|&&label| label > 1) {
        return Err(Error::invalid_input(
            "evaluation",
            format!("labels must be 0 or 1, found {label}"),
        ));
    }

    if scores.iter().any(|score| !score.is_finite()) {
        return Err(Error::invalid_input("evaluation", "scores must be finite"));
    }

    let predictions = binarize(scores);
    let confusion_matrix = ConfusionMatrix::from_predictions(labels, &predictions);

    let binarized: Vec<f64> = predictions.iter().map(|&p| p as f64).collect();
    let roc = roc_curve(labels, &binarized)?;

    Ok(Evaluation {
        accuracy: confusion_matrix.accuracy(),
        f1: confusion_matrix.f1(),
        auc: auc(&roc.fpr, &roc.tpr),
        confusion_matrix,
    })
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracy = {:.2}%", 100.0 * self.accuracy)?;
        writeln!(f, "AUC      = {:.5}", self.auc)?;
        writeln!(f, "F1       = {:.5}", self.f1)?;
        write!(f, "{}", self.confusion_matrix)
    }
}
