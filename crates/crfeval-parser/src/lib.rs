//! crfeval Parser - CRF++ result line parsing
//!
//! A CRF++ test run prints one token per line:
//!
//! ```text
//! word<TAB>pos_tag<TAB>gold_label<TAB>predicted_label
//! ```
//!
//! Only the last two columns matter for evaluation. Leading columns are
//! kept verbatim in the parsed [`Record`] so correct and wrong predictions
//! can be written back out unchanged.

pub mod source;

pub use source::{open_source, RecordReader};

use crfeval_core::{EvalError, LabelUniverse, Record, Result};

// ============================================================================
// Line Outcomes
// ============================================================================

/// What a single input line turned into
#[derive(Debug)]
pub enum ParsedLine {
    /// A record with both labels in the universe
    Record(Record),

    /// Blank or whitespace-only line; ignored and not counted
    Blank,

    /// Malformed line or unknown label; counted and skipped
    Rejected(EvalError),
}

// ============================================================================
// Record Parser
// ============================================================================

/// Splits lines on a delimiter and resolves the label columns
#[derive(Debug, Clone)]
pub struct RecordParser {
    delimiter: String,
}

impl RecordParser {
    /// Create a parser for a column delimiter
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Parse one line into a record.
    ///
    /// Returns `Ok(None)` for blank lines. `line_no` is 1-based and only
    /// used in error messages.
    pub fn parse_line(
        &self,
        line: &str,
        line_no: usize,
        universe: &LabelUniverse,
    ) -> Result<Option<Record>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        // rsplitn yields predicted first, then gold, then the untouched prefix
        let mut columns = line.rsplitn(3, self.delimiter.as_str());
        let (predicted, gold) = match (columns.next(), columns.next()) {
            (Some(predicted), Some(gold)) => (predicted, gold),
            _ => {
                return Err(EvalError::MalformedRecord {
                    line: line_no,
                    fields: line.split(self.delimiter.as_str()).count(),
                })
            }
        };

        let gold_id = universe
            .index_of(gold)
            .ok_or_else(|| EvalError::UnknownLabel {
                line: line_no,
                label: gold.to_string(),
            })?;
        let predicted_id = universe
            .index_of(predicted)
            .ok_or_else(|| EvalError::UnknownLabel {
                line: line_no,
                label: predicted.to_string(),
            })?;

        Ok(Some(Record::new(gold_id, predicted_id, line)))
    }

    /// Like [`parse_line`](Self::parse_line), folding recoverable errors
    /// into [`ParsedLine::Rejected`]
    pub fn classify_line(&self, line: &str, line_no: usize, universe: &LabelUniverse) -> ParsedLine {
        match self.parse_line(line, line_no, universe) {
            Ok(Some(record)) => ParsedLine::Record(record),
            Ok(None) => ParsedLine::Blank,
            Err(err) => ParsedLine::Rejected(err),
        }
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new("\t")
    }
}

// ============================================================================
// Tests
// ============================================================================
