//! Report rendering
//!
//! Text output follows the CRF++ evaluation layout: a tab-separated
//! confusion matrix followed by `(precision, recall, F1)` tuples per label.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crfeval_core::config::MAX_REPORT_PRECISION;

use crate::{ConfusionMatrix, Evaluator, MetricsReport, SummaryStats};

const COLUMN_SEP: char = '\t';

/// Everything needed to print or serialize one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub labels: Vec<String>,
    pub confusion_matrix: ConfusionMatrix,
    pub metrics: MetricsReport,
    pub summary: SummaryStats,
}

impl EvaluationReport {
    pub fn new(evaluator: &Evaluator) -> Self {
        Self {
            generated_at: Utc::now(),
            labels: evaluator.universe().labels().to_vec(),
            confusion_matrix: evaluator.confusion_matrix().clone(),
            metrics: evaluator.compute_metrics(),
            summary: evaluator.summary_stats(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Matrix, metrics and summary as plain text with `decimals` places
    pub fn to_text(&self, decimals: usize) -> String {
        let mut out = render_confusion_matrix(&self.labels, &self.confusion_matrix);
        out.push_str(&render_metrics(&self.metrics, decimals));
        out.push_str(&render_summary(&self.summary));
        out
    }
}

/// Tab-separated matrix with gold labels down the side
pub fn render_confusion_matrix(labels: &[String], matrix: &ConfusionMatrix) -> String {
    let mut out = String::from("====\nConfusion Matrix\n====\n");

    out.push(COLUMN_SEP);
    out.push(COLUMN_SEP);
    for label in labels {
        out.push_str(label);
        out.push(COLUMN_SEP);
    }
    out.push_str(" [predicted class]\n");

    for (label, row) in labels.iter().zip(matrix.rows()) {
        out.push_str(label);
        out.push(COLUMN_SEP);
        out.push(COLUMN_SEP);
        for count in row {
            let _ = write!(out, "{count}{COLUMN_SEP}");
        }
        out.push('\n');
    }

    out.push_str("[actual class]\n");
    out
}

/// `label = (precision, recall, f1)` lines and the accuracy line.
///
/// `decimals` is capped at [`MAX_REPORT_PRECISION`].
pub fn render_metrics(metrics: &MetricsReport, decimals: usize) -> String {
    let decimals = decimals.min(MAX_REPORT_PRECISION);
    let mut out = String::from("\n====\n(Precision, Recall, F1 score)\n====\n");

    for m in metrics.iter() {
        let _ = writeln!(
            out,
            "{} = ({:.prec$}, {:.prec$}, {:.prec$})",
            m.label,
            m.precision,
            m.recall,
            m.f1_score,
            prec = decimals
        );
    }
    let _ = writeln!(out, "Accuracy = {:.prec$}", metrics.accuracy(), prec = decimals);

    out
}

/// Correct/total line plus data quality counters
pub fn render_summary(stats: &SummaryStats) -> String {
    let mut out = format!(
        "\nSummary: {}/{} correct predictions\n",
        stats.correct_predictions, stats.total_predictions
    );
    if stats.skipped_lines > 0 || stats.unknown_label_rejections > 0 {
        let _ = writeln!(
            out,
            "Skipped: {} malformed line(s), {} unknown-label record(s)",
            stats.skipped_lines, stats.unknown_label_rejections
        );
    }
    out
}
