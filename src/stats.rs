//! Confusion-matrix and ROC statistics derived from classifier output.
//!
//! Everything here is recomputed from plain slices of true labels, predicted
//! labels, and positive-class probabilities; nothing holds model state. AUC
//! and the ROC curve walk tied probability values as a single group, so row
//! order never changes a result.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data_handling::LABEL_QUOTATION;
use crate::error::DataError;

/// Cross-tabulation of true vs. predicted class counts.
///
/// `quotation` is the positive class throughout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Quotations predicted as quotations.
    pub tp: usize,
    /// Noise predicted as noise.
    pub tn: usize,
    /// Noise predicted as quotations.
    pub fp: usize,
    /// Quotations predicted as noise.
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Tabulate from aligned slices of true and predicted labels (1 / -1).
    pub fn from_labels(truth: &[i32], predicted: &[i32]) -> Result<Self, DataError> {
        if truth.len() != predicted.len() {
            return Err(DataError::LengthMismatch {
                expected: truth.len(),
                actual: predicted.len(),
            });
        }

        let mut matrix = Self::default();
        for (&t, &p) in truth.iter().zip(predicted.iter()) {
            match (t == LABEL_QUOTATION, p == LABEL_QUOTATION) {
                (true, true) => matrix.tp += 1,
                (false, false) => matrix.tn += 1,
                (false, true) => matrix.fp += 1,
                (true, false) => matrix.fn_ += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// (TP + TN) / total.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// TP / (TP + FP).
    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    /// TP / (TP + FN), also called recall.
    pub fn sensitivity(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    /// TN / (TN + FP).
    pub fn specificity(&self) -> f64 {
        let denom = self.tn + self.fp;
        if denom == 0 {
            return 0.0;
        }
        self.tn as f64 / denom as f64
    }

    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.sensitivity();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }

    pub fn balanced_accuracy(&self) -> f64 {
        (self.sensitivity() + self.specificity()) / 2.0
    }
}

/// Named summary metrics for one evaluated split: the confusion-matrix
/// statistics joined with a separately computed AUC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub accuracy: f64,
    pub balanced_accuracy: f64,
    pub precision: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub f1_score: f64,
    pub auc: f64,
    pub support: usize,
    pub confusion_matrix: ConfusionMatrix,
}

impl AccuracyReport {
    pub fn new(cm: ConfusionMatrix, auc: f64) -> Self {
        Self {
            accuracy: cm.accuracy(),
            balanced_accuracy: cm.balanced_accuracy(),
            precision: cm.precision(),
            sensitivity: cm.sensitivity(),
            specificity: cm.specificity(),
            f1_score: cm.f1_score(),
            auc,
            support: cm.total(),
            confusion_matrix: cm,
        }
    }

    /// Human-readable summary table.
    pub fn format(&self) -> String {
        format!(
            r#"Accuracy Report
===============
Accuracy:          {:.4}
Balanced Accuracy: {:.4}
Precision:         {:.4}
Sensitivity:       {:.4}
Specificity:       {:.4}
F1 Score:          {:.4}
AUC:               {:.4}
Support:           {}

Confusion Matrix:
                 Predicted
                 Quotation   Noise
True Quotation  {:>8}  {:>8}
     Noise      {:>8}  {:>8}
"#,
            self.accuracy,
            self.balanced_accuracy,
            self.precision,
            self.sensitivity,
            self.specificity,
            self.f1_score,
            self.auc,
            self.support,
            self.confusion_matrix.tp,
            self.confusion_matrix.fn_,
            self.confusion_matrix.fp,
            self.confusion_matrix.tn,
        )
    }
}

/// One operating point of an ROC curve: classify as quotation when the
/// predicted probability is at least `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    /// Sensitivity at this threshold.
    pub tpr: f64,
    /// 1 - specificity at this threshold.
    pub fpr: f64,
}

/// A finite, restartable ROC curve spanning every observed probability value.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    points: Vec<RocPoint>,
}

impl RocCurve {
    /// Build the curve from true labels and positive-class probabilities.
    /// One point is emitted per distinct probability value, in decreasing
    /// threshold order.
    pub fn from_scores(truth: &[i32], probs: &[f64]) -> Result<RocCurve, DataError> {
        if truth.len() != probs.len() {
            return Err(DataError::LengthMismatch {
                expected: truth.len(),
                actual: probs.len(),
            });
        }
        if truth.is_empty() {
            return Err(DataError::NotEnoughRows(0));
        }

        let n_pos = truth.iter().filter(|&&t| t == LABEL_QUOTATION).count() as f64;
        let n_neg = truth.len() as f64 - n_pos;

        let mut order: Vec<usize> = (0..probs.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            probs[b].partial_cmp(&probs[a]).unwrap_or(Ordering::Equal)
        });

        let mut points = Vec::new();
        let (mut tp, mut fp) = (0.0f64, 0.0f64);
        let mut i = 0;
        while i < order.len() {
            let threshold = probs[order[i]];
            // consume the whole tie group before emitting a point
            while i < order.len() && probs[order[i]] == threshold {
                if truth[order[i]] == LABEL_QUOTATION {
                    tp += 1.0;
                } else {
                    fp += 1.0;
                }
                i += 1;
            }
            points.push(RocPoint {
                threshold,
                tpr: if n_pos > 0.0 { tp / n_pos } else { 0.0 },
                fpr: if n_neg > 0.0 { fp / n_neg } else { 0.0 },
            });
        }

        Ok(RocCurve { points })
    }

    /// Iterate the curve points; the iterator can be restarted by calling
    /// this again.
    pub fn iter(&self) -> std::slice::Iter<'_, RocPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[RocPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Select the observed point nearest each requested threshold, for
    /// annotating plots. Requested values outside the observed range snap to
    /// the closest endpoint.
    pub fn annotate(&self, thresholds: &[f64]) -> Vec<RocPoint> {
        thresholds
            .iter()
            .filter_map(|&t| {
                self.points
                    .iter()
                    .min_by(|a, b| {
                        let da = (a.threshold - t).abs();
                        let db = (b.threshold - t).abs();
                        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                    })
                    .copied()
            })
            .collect()
    }
}

/// Area under the ROC curve by the trapezoidal rule.
///
/// Tied probabilities are walked as one group, so the result is invariant to
/// row order; uniform probabilities on a two-class set yield exactly 0.5.
/// Degenerate inputs (a single class, or no rows) return 0.5.
pub fn auc(truth: &[i32], probs: &[f64]) -> f64 {
    assert_eq!(
        truth.len(),
        probs.len(),
        "truth and probability slices must have equal lengths"
    );

    let n_pos = truth.iter().filter(|&&t| t == LABEL_QUOTATION).count() as f64;
    let n_neg = truth.len() as f64 - n_pos;
    if n_pos == 0.0 || n_neg == 0.0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_unstable_by(|&a, &b| probs[b].partial_cmp(&probs[a]).unwrap_or(Ordering::Equal));

    let mut area = 0.0;
    let (mut tp, mut fp) = (0.0f64, 0.0f64);
    let (mut tpr_prev, mut fpr_prev) = (0.0f64, 0.0f64);
    let mut i = 0;
    while i < order.len() {
        let threshold = probs[order[i]];
        while i < order.len() && probs[order[i]] == threshold {
            if truth[order[i]] == LABEL_QUOTATION {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        let tpr = tp / n_pos;
        let fpr = fp / n_neg;
        area += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;
        tpr_prev = tpr;
        fpr_prev = fpr;
    }

    area
}
