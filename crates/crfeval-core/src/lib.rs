//! crfeval Core - Label universe, records, and shared error types
//!
//! This crate defines the building blocks used throughout crfeval:
//! - The ordered label universe that fixes matrix dimensions and report layout
//! - Parsed token records (gold label, predicted label, original line)
//! - The error taxonomy shared by ingestion and evaluation
//! - Configuration management

pub mod config;

pub use config::{ConfigError, EvalConfig, InputConfig, LoggingConfig, OutputConfig};

use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for evaluation
#[derive(Error, Debug)]
pub enum EvalError {
    /// Invalid label universe or configuration value; raised before ingestion
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A line does not carry the gold and predicted label columns
    #[error("Malformed record at line {line}: expected at least 2 fields, found {fields}")]
    MalformedRecord { line: usize, fields: usize },

    /// A gold or predicted label outside the label universe
    #[error("Unknown label at line {line}: {label:?}")]
    UnknownLabel { line: usize, label: String },

    /// The input source could not be opened or decoded
    #[error("Source unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EvalError {
    /// Per-line errors are counted and skipped; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::UnknownLabel { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

// ============================================================================
// Label Universe
// ============================================================================

/// Position of a label inside a [`LabelUniverse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(usize);

impl LabelId {
    /// Row/column index in the confusion matrix
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered set of known labels.
///
/// The order given at construction is the row and column order of the
/// confusion matrix and of every report, so it is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUniverse {
    labels: Vec<String>,
    index: HashMap<String, LabelId>,
}

impl LabelUniverse {
    /// Build a universe from labels in report order.
    ///
    /// Fails with [`EvalError::Configuration`] when `labels` is empty or
    /// contains the same label twice.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.is_empty() {
            return Err(EvalError::Configuration(
                "label universe must contain at least one label".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), LabelId(i)).is_some() {
                return Err(EvalError::Configuration(format!(
                    "duplicate label in universe: {label:?}"
                )));
            }
        }

        Ok(Self { labels, index })
    }

    /// Number of labels (matrix dimension N)
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; an empty universe cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up a label's position
    pub fn index_of(&self, label: &str) -> Option<LabelId> {
        self.index.get(label).copied()
    }

    /// Label at a position, if in range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Label for an id produced by this universe.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a larger universe.
    pub fn label(&self, id: LabelId) -> &str {
        &self.labels[id.0]
    }

    /// Labels in universe order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate `(id, label)` pairs in universe order
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &str)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (LabelId(i), label.as_str()))
    }
}

// ============================================================================
// Records
// ============================================================================

/// One evaluated token: its gold and predicted label plus the source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    gold: LabelId,
    predicted: LabelId,
    line: String,
}

impl Record {
    /// Create a record from resolved label ids
    pub fn new(gold: LabelId, predicted: LabelId, line: impl Into<String>) -> Self {
        Self {
            gold,
            predicted,
            line: line.into(),
        }
    }

    pub fn gold(&self) -> LabelId {
        self.gold
    }

    pub fn predicted(&self) -> LabelId {
        self.predicted
    }

    /// Trimmed source line, including word and POS columns
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Whether the prediction matches the gold label
    pub fn is_correct(&self) -> bool {
        self.gold == self.predicted
    }
}

// ============================================================================
// Tests
// ============================================================================
