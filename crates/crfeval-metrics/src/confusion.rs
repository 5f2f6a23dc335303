//! Confusion matrix accumulator
//!
//! Counts are stored row-major in a flat grid sized once from the label
//! universe: entry `(gold, predicted)` lives at `gold * n + predicted`.

use serde::{Serialize, Serializer};

use crfeval_core::LabelId;

/// N×N count grid; rows are gold labels, columns are predicted labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    cells: Vec<usize>,
    size: usize,
}

impl ConfusionMatrix {
    /// Zero matrix for `size` labels
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size * size],
            size,
        }
    }

    /// Number of labels (rows and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Count one (gold, predicted) pair.
    ///
    /// # Panics
    ///
    /// Panics if either id lies outside this matrix, e.g. when it came from
    /// a larger label universe.
    pub fn record(&mut self, gold: LabelId, predicted: LabelId) {
        assert!(
            gold.index() < self.size && predicted.index() < self.size,
            "label ids ({}, {}) out of range for {}x{} confusion matrix",
            gold.index(),
            predicted.index(),
            self.size,
            self.size
        );
        self.cells[gold.index() * self.size + predicted.index()] += 1;
    }

    /// Cell at (gold index, predicted index)
    pub fn get(&self, gold: usize, predicted: usize) -> usize {
        self.cells[gold * self.size + predicted]
    }

    /// Predictions for one gold label, in universe order
    pub fn row(&self, gold: usize) -> &[usize] {
        let start = gold * self.size;
        &self.cells[start..start + self.size]
    }

    /// Iterate rows in universe order
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        // chunks_exact(0) panics
        self.cells.chunks_exact(self.size.max(1))
    }

    /// Occurrences of a gold label
    pub fn row_sum(&self, gold: usize) -> usize {
        self.row(gold).iter().sum()
    }

    /// Times a label was predicted
    pub fn column_sum(&self, predicted: usize) -> usize {
        (0..self.size).map(|r| self.get(r, predicted)).sum()
    }

    /// Sum of all cells
    pub fn total(&self) -> usize {
        self.cells.iter().sum()
    }

    /// Sum of the diagonal (correct predictions)
    pub fn correct(&self) -> usize {
        (0..self.size).map(|i| self.get(i, i)).sum()
    }

    /// Owned 2D copy
    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        self.rows().map(<[usize]>::to_vec).collect()
    }

    /// Add another matrix of the same size cell by cell
    pub(crate) fn merge(&mut self, other: &ConfusionMatrix) {
        debug_assert_eq!(self.size, other.size);
        for (cell, add) in self.cells.iter_mut().zip(&other.cells) {
            *cell += add;
        }
    }
}

impl Serialize for ConfusionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
