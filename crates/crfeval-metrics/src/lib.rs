//! crfeval Metrics - Confusion matrix evaluation of CRF predictions
//!
//! Feeds parsed `(gold, predicted)` records into an N×N confusion matrix
//! and derives per-label precision, recall and F1 score plus overall
//! accuracy. [`Evaluator`] ties the pieces together:
//!
//! ```no_run
//! use crfeval_core::LabelUniverse;
//! use crfeval_metrics::Evaluator;
//!
//! let universe = LabelUniverse::new(["I-NP", "B-NP", "B-ADJP", "I-ADJP"])?;
//! let evaluator = Evaluator::with_source(universe, "sample/sample_crf_output")?;
//!
//! let metrics = evaluator.compute_metrics();
//! println!("accuracy = {:.4}", metrics.accuracy());
//! # Ok::<(), crfeval_core::EvalError>(())
//! ```

pub mod confusion;
pub mod evaluator;
pub mod metrics;
pub mod report;

pub use confusion::ConfusionMatrix;
pub use evaluator::{Evaluator, IngestionSummary, PredictionSplit, SummaryStats};
pub use metrics::{LabelCounts, LabelMetrics, MetricsReport, OverallMetrics};
pub use report::EvaluationReport;
