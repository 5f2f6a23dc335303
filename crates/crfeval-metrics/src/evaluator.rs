//! Evaluator: ingestion, accumulation and export
//!
//! Ingestion is staged. Each load builds its own matrix and counters and
//! merges them into the evaluator only once the whole source has been read,
//! so a source that fails halfway leaves earlier results untouched.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crfeval_core::{EvalConfig, EvalError, LabelUniverse, Record, Result};
use crfeval_parser::{open_source, ParsedLine, RecordParser, RecordReader};

use crate::{ConfusionMatrix, EvaluationReport, MetricsReport};

// ============================================================================
// Summaries
// ============================================================================

/// Outcome of a single load call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    /// Records added to the confusion matrix
    pub processed: usize,
    /// Malformed lines skipped
    pub skipped: usize,
    /// Records rejected for a label outside the universe
    pub unknown_label_rejections: usize,
}

/// Aggregate counters over everything loaded so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_predictions: usize,
    pub correct_predictions: usize,
    pub incorrect_predictions: usize,
    pub skipped_lines: usize,
    pub unknown_label_rejections: usize,
    pub num_labels: usize,
}

/// Lines written by [`Evaluator::export_prediction_split`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionSplit {
    pub correct: usize,
    pub incorrect: usize,
}

/// Work in progress for one source
struct Ingestion {
    matrix: ConfusionMatrix,
    records: Vec<Record>,
    summary: IngestionSummary,
}

// ============================================================================
// Evaluator
// ============================================================================

/// Accumulates CRF predictions over a fixed label universe
#[derive(Debug, Clone)]
pub struct Evaluator {
    universe: LabelUniverse,
    parser: RecordParser,
    matrix: ConfusionMatrix,
    records: Vec<Record>,
    retain_records: bool,
    skipped: usize,
    unknown_label_rejections: usize,
}

impl Evaluator {
    /// Create an empty evaluator over `universe`
    pub fn new(universe: LabelUniverse) -> Self {
        let matrix = ConfusionMatrix::new(universe.len());
        Self {
            universe,
            parser: RecordParser::default(),
            matrix,
            records: Vec::new(),
            retain_records: true,
            skipped: 0,
            unknown_label_rejections: 0,
        }
    }

    /// Create an evaluator and load a result file immediately
    pub fn with_source(universe: LabelUniverse, path: impl AsRef<Path>) -> Result<Self> {
        let mut evaluator = Self::new(universe);
        evaluator.load_from_path(path)?;
        Ok(evaluator)
    }

    /// Create an evaluator from labels, delimiter and retention settings
    pub fn from_config(config: &EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.label_universe()?)
            .with_delimiter(config.input.delimiter.clone())
            .with_record_retention(config.input.retain_records))
    }

    /// Set the column delimiter (tab by default)
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.parser = RecordParser::new(delimiter);
        self
    }

    /// Enable/disable keeping parsed records for export
    pub fn with_record_retention(mut self, retain: bool) -> Self {
        self.retain_records = retain;
        self
    }

    pub fn universe(&self) -> &LabelUniverse {
        &self.universe
    }

    /// Load a CRF++ result file
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<IngestionSummary> {
        let path = path.as_ref();
        let reader = open_source(path)?;
        self.load_from_reader(reader, path.display().to_string())
    }

    /// Load CRF++ results from any buffered reader
    pub fn load_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        source_name: impl Into<String>,
    ) -> Result<IngestionSummary> {
        let source_name = source_name.into();
        let mut staged = Ingestion {
            matrix: ConfusionMatrix::new(self.universe.len()),
            records: Vec::new(),
            summary: IngestionSummary::default(),
        };

        for outcome in RecordReader::new(reader, source_name.as_str(), &self.parser, &self.universe) {
            match outcome? {
                ParsedLine::Record(record) => {
                    staged.matrix.record(record.gold(), record.predicted());
                    staged.summary.processed += 1;
                    if self.retain_records {
                        staged.records.push(record);
                    }
                }
                ParsedLine::Blank => {}
                ParsedLine::Rejected(err) => {
                    debug!(source = %source_name, error = %err, "skipping line");
                    match err {
                        EvalError::UnknownLabel { .. } => {
                            staged.summary.unknown_label_rejections += 1
                        }
                        _ => staged.summary.skipped += 1,
                    }
                }
            }
        }

        let summary = staged.summary;
        self.matrix.merge(&staged.matrix);
        self.records.extend(staged.records);
        self.skipped += summary.skipped;
        self.unknown_label_rejections += summary.unknown_label_rejections;

        info!(
            source = %source_name,
            processed = summary.processed,
            skipped = summary.skipped,
            unknown_labels = summary.unknown_label_rejections,
            "loaded predictions"
        );
        if summary.unknown_label_rejections > 0 {
            warn!(
                source = %source_name,
                count = summary.unknown_label_rejections,
                "records rejected for labels outside the universe"
            );
        }

        Ok(summary)
    }

    /// Count a single (gold, predicted) pair given as label strings.
    ///
    /// Unknown labels are counted as rejections and returned as
    /// [`EvalError::UnknownLabel`] with line 0.
    pub fn record(&mut self, gold: &str, predicted: &str) -> Result<()> {
        let resolved = self
            .universe
            .index_of(gold)
            .ok_or(gold)
            .and_then(|g| self.universe.index_of(predicted).map(|p| (g, p)).ok_or(predicted));

        let (gold_id, predicted_id) = match resolved {
            Ok(ids) => ids,
            Err(unknown) => {
                self.unknown_label_rejections += 1;
                return Err(EvalError::UnknownLabel {
                    line: 0,
                    label: unknown.to_string(),
                });
            }
        };

        self.matrix.record(gold_id, predicted_id);
        if self.retain_records {
            let line = format!("{gold}{}{predicted}", self.parser.delimiter());
            self.records.push(Record::new(gold_id, predicted_id, line));
        }
        Ok(())
    }

    /// Per-label precision/recall/F1 and accuracy for the current counts
    pub fn compute_metrics(&self) -> MetricsReport {
        MetricsReport::from_matrix(&self.matrix, &self.universe)
    }

    /// Read-only confusion matrix in universe order
    pub fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.matrix
    }

    pub fn summary_stats(&self) -> SummaryStats {
        let total = self.matrix.total();
        let correct = self.matrix.correct();
        SummaryStats {
            total_predictions: total,
            correct_predictions: correct,
            incorrect_predictions: total - correct,
            skipped_lines: self.skipped,
            unknown_label_rejections: self.unknown_label_rejections,
            num_labels: self.universe.len(),
        }
    }

    /// Records kept for export; empty when retention is disabled
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Write retained record lines to `correct` or `incorrect` depending on
    /// whether gold and predicted labels match
    pub fn export_prediction_split<C, W>(
        &self,
        correct: &mut C,
        incorrect: &mut W,
    ) -> io::Result<PredictionSplit>
    where
        C: Write + ?Sized,
        W: Write + ?Sized,
    {
        let mut split = PredictionSplit::default();

        for record in &self.records {
            if record.is_correct() {
                writeln!(correct, "{}", record.line())?;
                split.correct += 1;
            } else {
                writeln!(incorrect, "{}", record.line())?;
                split.incorrect += 1;
            }
        }

        correct.flush()?;
        incorrect.flush()?;
        Ok(split)
    }

    /// Snapshot of labels, matrix, metrics and counters
    pub fn report(&self) -> EvaluationReport {
        EvaluationReport::new(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
