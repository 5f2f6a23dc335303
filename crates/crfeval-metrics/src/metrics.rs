//! Quality Metrics module
//!
//! Derives per-label precision, recall and F1 score plus overall accuracy
//! from a confusion matrix snapshot.
//!
//! Every ratio with a zero denominator is reported as `0.0`, never NaN: a
//! label that was never predicted has precision 0, a label that never
//! occurs in the gold data has recall 0, and an empty matrix has
//! accuracy 0.

use serde::Serialize;

use crfeval_core::LabelUniverse;

use crate::ConfusionMatrix;

// ============================================================================
// Label Counts
// ============================================================================

/// One-vs-rest counts for a single label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    /// Gold label predicted correctly (diagonal cell)
    pub true_positives: usize,
    /// Other gold labels predicted as this label (rest of the column)
    pub false_positives: usize,
    /// This gold label predicted as something else (rest of the row)
    pub false_negatives: usize,
}

impl LabelCounts {
    /// Read the counts for label `index` out of a matrix
    pub fn from_matrix(matrix: &ConfusionMatrix, index: usize) -> Self {
        let true_positives = matrix.get(index, index);
        Self {
            true_positives,
            false_positives: matrix.column_sum(index) - true_positives,
            false_negatives: matrix.row_sum(index) - true_positives,
        }
    }

    /// Times the label was predicted (precision denominator)
    pub fn predicted_total(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// Times the label occurs in the gold data (recall denominator, support)
    pub fn gold_total(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.predicted_total())
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.gold_total())
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ============================================================================
// Metrics Report
// ============================================================================

/// Metrics for one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub true_positives: usize,
    /// Column sum; denominator of precision
    pub predicted_total: usize,
    /// Row sum; denominator of recall
    pub gold_total: usize,
}

impl LabelMetrics {
    fn new(label: &str, counts: LabelCounts) -> Self {
        Self {
            label: label.to_string(),
            precision: counts.precision(),
            recall: counts.recall(),
            f1_score: counts.f1_score(),
            true_positives: counts.true_positives,
            predicted_total: counts.predicted_total(),
            gold_total: counts.gold_total(),
        }
    }
}

/// Accuracy over all labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallMetrics {
    pub accuracy: f64,
    pub total_samples: usize,
    pub correct_predictions: usize,
}

/// Per-label metrics in universe order plus overall accuracy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub labels: Vec<LabelMetrics>,
    pub overall: OverallMetrics,
}

impl MetricsReport {
    /// Compute metrics from a matrix built over `universe`
    pub fn from_matrix(matrix: &ConfusionMatrix, universe: &LabelUniverse) -> Self {
        debug_assert_eq!(matrix.size(), universe.len());

        let labels = universe
            .iter()
            .map(|(id, label)| LabelMetrics::new(label, LabelCounts::from_matrix(matrix, id.index())))
            .collect();

        let total_samples = matrix.total();
        let correct_predictions = matrix.correct();

        Self {
            labels,
            overall: OverallMetrics {
                accuracy: ratio(correct_predictions, total_samples),
                total_samples,
                correct_predictions,
            },
        }
    }

    /// Metrics for a label, if it is in the universe
    pub fn get(&self, label: &str) -> Option<&LabelMetrics> {
        self.labels.iter().find(|m| m.label == label)
    }

    /// Per-label metrics in universe order
    pub fn iter(&self) -> impl Iterator<Item = &LabelMetrics> + '_ {
        self.labels.iter()
    }

    pub fn accuracy(&self) -> f64 {
        self.overall.accuracy
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_from(universe: &LabelUniverse, pairs: &[(&str, &str)]) -> ConfusionMatrix {
        let mut matrix = ConfusionMatrix::new(universe.len());
        for (gold, predicted) in pairs {
            matrix.record(
                universe.index_of(gold).unwrap(),
                universe.index_of(predicted).unwrap(),
            );
        }
        matrix
    }

    #[test]
    fn test_label_counts_precision() {
        let counts = LabelCounts {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 0,
        };

        assert!((counts.precision() - 0.8).abs() < 1e-9);
        assert_eq!(counts.predicted_total(), 10);
    }

    #[test]
    fn test_label_counts_recall() {
        let counts = LabelCounts {
            true_positives: 8,
            false_positives: 0,
            false_negatives: 2,
        };

        assert!((counts.recall() - 0.8).abs() < 1e-9);
        assert_eq!(counts.gold_total(), 10);
    }

    #[test]
    fn test_label_counts_zero() {
        let counts = LabelCounts::default();

        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.recall(), 0.0);
        assert_eq!(counts.f1_score(), 0.0);
    }

    #[test]
    fn test_two_label_scenario() {
        let universe = LabelUniverse::new(["A", "B"]).unwrap();
        let matrix = matrix_from(&universe, &[("A", "A"), ("A", "B"), ("B", "B"), ("B", "B")]);

        let report = MetricsReport::from_matrix(&matrix, &universe);

        let a = report.get("A").unwrap();
        assert!((a.precision - 1.0).abs() < 1e-9);
        assert!((a.recall - 0.5).abs() < 1e-9);
        assert!((a.f1_score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(a.true_positives, 1);
        assert_eq!(a.predicted_total, 1);
        assert_eq!(a.gold_total, 2);

        let b = report.get("B").unwrap();
        assert!((b.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((b.recall - 1.0).abs() < 1e-9);
        assert!((b.f1_score - 0.8).abs() < 1e-9);

        assert!((report.accuracy() - 0.75).abs() < 1e-9);
        assert_eq!(report.overall.total_samples, 4);
        assert_eq!(report.overall.correct_predictions, 3);
    }

    #[test]
    fn test_unseen_label_is_zero_not_nan() {
        let universe = LabelUniverse::new(["A", "B", "C"]).unwrap();
        let matrix = matrix_from(&universe, &[("A", "A"), ("B", "A")]);

        let report = MetricsReport::from_matrix(&matrix, &universe);
        let c = report.get("C").unwrap();

        assert_eq!(c.precision, 0.0);
        assert_eq!(c.recall, 0.0);
        assert_eq!(c.f1_score, 0.0);
        assert!(report.iter().all(|m| !m.f1_score.is_nan()));
    }

    #[test]
    fn test_never_predicted_label() {
        let universe = LabelUniverse::new(["A", "B"]).unwrap();
        let matrix = matrix_from(&universe, &[("B", "A"), ("B", "A")]);

        let report = MetricsReport::from_matrix(&matrix, &universe);
        let b = report.get("B").unwrap();

        assert_eq!(b.predicted_total, 0);
        assert_eq!(b.precision, 0.0);
        assert_eq!(b.recall, 0.0);
    }

    #[test]
    fn test_all_diagonal_accuracy() {
        let universe = LabelUniverse::new(["A", "B", "C"]).unwrap();
        let matrix = matrix_from(&universe, &[("A", "A"), ("B", "B"), ("C", "C"), ("C", "C")]);

        let report = MetricsReport::from_matrix(&matrix, &universe);

        assert_eq!(report.accuracy(), 1.0);
        assert!(report.iter().all(|m| m.f1_score == 1.0));
    }

    #[test]
    fn test_empty_matrix_accuracy() {
        let universe = LabelUniverse::new(["A", "B"]).unwrap();
        let report = MetricsReport::from_matrix(&ConfusionMatrix::new(2), &universe);

        assert_eq!(report.accuracy(), 0.0);
        assert_eq!(report.overall.total_samples, 0);
        assert_eq!(report.labels.len(), 2);
    }

    #[test]
    fn test_report_keeps_universe_order() {
        let universe = LabelUniverse::new(["I-NP", "B-NP", "B-ADJP", "I-ADJP"]).unwrap();
        let report = MetricsReport::from_matrix(&ConfusionMatrix::new(4), &universe);

        let order: Vec<&str> = report.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(order, vec!["I-NP", "B-NP", "B-ADJP", "I-ADJP"]);
        assert!(report.get("O").is_none());
    }
}
